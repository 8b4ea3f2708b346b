// Hoop net: rings of small bodies tied with rope joints, top ring pinned to the rim.
// Strings are drawn as gizmo lines between the visual nodes every frame.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::{GameConfig, HoopConfig, NetConfig};
use crate::plugins::court::{BALL_GROUP, NET_GROUP};
use crate::plugins::sync::{spawn_pair, EntityPair, EntityRegistry};

#[derive(Component)]
pub struct NetNode {
    pub ring: usize,
    pub segment: usize,
}

/// Node index as (ring, segment).
pub type NodeIndex = (usize, usize);

/// Visual entities of every link, rebuilt once when the net is built.
#[derive(Resource, Default)]
pub struct NetTopology {
    pub links: Vec<(Entity, Entity)>,
}

pub struct NetPlugin;
impl Plugin for NetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NetTopology>()
            .add_systems(Startup, build_net)
            .add_systems(Update, draw_net_strings);
    }
}

/// Node positions per ring. Ring 0 sits on the rim; each lower ring drops by
/// `ring_spacing` and narrows linearly toward `taper * rim_radius`. Odd rings are
/// rotated half a segment so the strings zig-zag like a real net.
pub fn net_ring_layout(net: &NetConfig, hoop: &HoopConfig) -> Vec<Vec<Vec3>> {
    let center = hoop.rim_center.to_vec3();
    let segments = net.segments.max(3) as usize;
    let rings = net.rings as usize;
    (0..=rings)
        .map(|i| {
            let t = if rings == 0 { 0.0 } else { i as f32 / rings as f32 };
            let radius = hoop.rim_radius * (1.0 + (net.taper - 1.0) * t);
            let y = center.y - i as f32 * net.ring_spacing;
            let offset = if i % 2 == 1 { 0.5 } else { 0.0 };
            (0..segments)
                .map(|j| {
                    let a = (j as f32 + offset) / segments as f32 * std::f32::consts::TAU;
                    Vec3::new(center.x + radius * a.cos(), y, center.z + radius * a.sin())
                })
                .collect()
        })
        .collect()
}

/// Links between nodes: around each ring, and from each node below ring 0 to
/// the node above it and that node's neighbour.
pub fn net_links(rings: usize, segments: usize) -> Vec<(NodeIndex, NodeIndex)> {
    let mut links = Vec::new();
    for i in 0..=rings {
        for j in 0..segments {
            links.push(((i, j), (i, (j + 1) % segments)));
            if i > 0 {
                // Odd rings sit half a segment ahead of the ring above.
                let k = if i % 2 == 1 { (j + 1) % segments } else { (j + segments - 1) % segments };
                links.push(((i, j), (i - 1, j)));
                links.push(((i, j), (i - 1, k)));
            }
        }
    }
    links
}

fn build_net(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut registry: ResMut<EntityRegistry>,
    mut topology: ResMut<NetTopology>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let net = &cfg.net;
    let layout = net_ring_layout(net, &cfg.hoop);
    let mesh = meshes.add(Sphere::new(net.node_radius).mesh().uv(8, 6));
    let material = mats.add(Color::srgb(0.95, 0.95, 0.95));

    let mut nodes: Vec<Vec<EntityPair<Entity>>> = Vec::with_capacity(layout.len());
    for (i, ring) in layout.iter().enumerate() {
        let mut row = Vec::with_capacity(ring.len());
        for (j, &pos) in ring.iter().enumerate() {
            let body = if i == 0 { RigidBody::Fixed } else { RigidBody::Dynamic };
            let pair = spawn_pair(
                &mut commands,
                &mut registry,
                Transform::from_translation(pos),
                (
                    body,
                    Collider::ball(net.node_radius),
                    ColliderMassProperties::Mass(net.node_mass),
                    CollisionGroups::new(NET_GROUP, BALL_GROUP),
                    Damping { linear_damping: 1.5, angular_damping: 1.0 },
                    NetNode { ring: i, segment: j },
                ),
                PbrBundle { mesh: mesh.clone(), material: material.clone(), ..default() },
            );
            row.push(pair);
        }
        nodes.push(row);
    }

    let segments = layout.first().map(|r| r.len()).unwrap_or(0);
    let links = net_links(layout.len().saturating_sub(1), segments);
    topology.links.clear();
    for &((i, j), (k, l)) in &links {
        let (a, b) = (nodes[i][j], nodes[k][l]);
        topology.links.push((a.visual, b.visual));
        // Ropes within the pinned ring carry no load.
        if i == 0 && k == 0 {
            continue;
        }
        let len = layout[i][j].distance(layout[k][l]);
        let rope = RopeJointBuilder::new(len);
        // A body holds one joint directly; the rest hang off child entities.
        commands.entity(a.physics).with_children(|c| {
            c.spawn((TransformBundle::default(), ImpulseJoint::new(b.physics, rope)));
        });
    }
    info!("NET built nodes={} links={}", nodes.iter().map(Vec::len).sum::<usize>(), links.len());
}

fn draw_net_strings(
    topology: Res<NetTopology>,
    q: Query<&GlobalTransform>,
    mut gizmos: Gizmos,
) {
    let color = Color::srgb(0.92, 0.92, 0.92);
    for &(a, b) in &topology.links {
        let (Ok(ta), Ok(tb)) = (q.get(a), q.get(b)) else { continue; };
        gizmos.line(ta.translation(), tb.translation(), color);
    }
}
