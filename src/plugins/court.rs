// World builder: court, walls, hoop, backboard, bench, decorations and the score sensor.
// Every solid piece is a physics/visual pair registered for per-frame sync.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::GameConfig;
use crate::plugins::scoring::ScoreSensor;
use crate::plugins::sync::{spawn_pair, EntityRegistry};

/// Collision groups. Balls hit everything; the net only meets balls; static
/// scenery never touches the net.
pub const BALL_GROUP: Group = Group::GROUP_1;
pub const NET_GROUP: Group = Group::GROUP_2;
pub const SCENERY_GROUP: Group = Group::GROUP_3;

pub fn scenery_groups() -> CollisionGroups {
    CollisionGroups::new(SCENERY_GROUP, Group::ALL)
}

/// Depth of the score sensor below the rim plane.
pub const SENSOR_DROP: f32 = 0.15;

#[derive(Component)]
pub struct Rim;

#[derive(Component)]
pub struct Backboard;

pub struct CourtPlugin;
impl Plugin for CourtPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, build_court);
    }
}

/// Static box: fixed body with a cuboid collider and a matching mesh.
fn spawn_block(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
    half: Vec3,
    restitution: f32,
) -> Entity {
    let pair = spawn_pair(
        commands,
        registry,
        transform,
        (
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y, half.z),
            Restitution::coefficient(restitution),
            Friction::coefficient(0.6),
            scenery_groups(),
        ),
        PbrBundle {
            mesh: meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0)),
            material,
            ..default()
        },
    );
    pair.physics
}

/// Points on the rim ring used for the compound rim collider.
pub fn rim_points(radius: f32, segments: u32) -> Vec<Vec3> {
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
        })
        .collect()
}

fn build_court(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut registry: ResMut<EntityRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
    assets: Res<AssetServer>,
) {
    let court = &cfg.court;
    let hoop = &cfg.hoop;

    // Ground and platform
    let grass = mats.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.45, 0.22),
        perceptual_roughness: 1.0,
        ..default()
    });
    let g = court.ground_half_extent;
    spawn_block(&mut commands, &mut registry, &mut meshes, grass,
        Transform::from_xyz(0.0, -0.12, 0.0), Vec3::new(g, 0.1, g), 0.3);

    let floor = mats.add(StandardMaterial {
        base_color: Color::srgb(0.78, 0.55, 0.32),
        base_color_texture: court.floor_texture.as_ref().map(|path| assets.load(path.clone())),
        perceptual_roughness: 0.6,
        ..default()
    });
    let p = court.platform_half_extent;
    spawn_block(&mut commands, &mut registry, &mut meshes, floor,
        Transform::from_xyz(0.0, -0.05, 0.0), Vec3::new(p, 0.05, p), 0.6);

    // Walls around the platform
    let wall_mat = mats.add(StandardMaterial {
        base_color: Color::srgba(0.85, 0.88, 0.92, 0.35),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let h = court.wall_height * 0.5;
    let t = 0.05;
    for (pos, half) in [
        (Vec3::new(0.0, h, -p - t), Vec3::new(p + 2.0 * t, h, t)),
        (Vec3::new(0.0, h, p + t), Vec3::new(p + 2.0 * t, h, t)),
        (Vec3::new(-p - t, h, 0.0), Vec3::new(t, h, p)),
        (Vec3::new(p + t, h, 0.0), Vec3::new(t, h, p)),
    ] {
        spawn_block(&mut commands, &mut registry, &mut meshes, wall_mat.clone(),
            Transform::from_translation(pos), half, 0.5);
    }

    // Backboard, bracket and pole
    let rim = hoop.rim_center.to_vec3();
    let board = hoop.backboard_size.to_vec3() * 0.5;
    let board_z = rim.z - hoop.rim_radius - 0.15 - board.z;
    let board_mat = mats.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.95, 0.97),
        base_color_texture: court.backboard_texture.as_ref().map(|path| assets.load(path.clone())),
        ..default()
    });
    let board_entity = spawn_block(&mut commands, &mut registry, &mut meshes, board_mat,
        Transform::from_xyz(rim.x, rim.y + board.y - 0.15, board_z), board, 0.5);
    commands.entity(board_entity).insert(Backboard);

    let metal = mats.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.36, 0.40),
        metallic: 0.8,
        perceptual_roughness: 0.4,
        ..default()
    });
    let bracket_len = (rim.z - hoop.rim_radius) - (board_z + board.z);
    spawn_block(&mut commands, &mut registry, &mut meshes, metal.clone(),
        Transform::from_xyz(rim.x, rim.y - 0.03, board_z + board.z + bracket_len * 0.5),
        Vec3::new(0.08, 0.02, bracket_len * 0.5), 0.3);

    let pole_z = board_z - board.z - 0.6;
    let pole_half = hoop.pole_height * 0.5;
    spawn_pair(
        &mut commands,
        &mut registry,
        Transform::from_xyz(rim.x, pole_half, pole_z),
        (RigidBody::Fixed, Collider::cylinder(pole_half, 0.08), scenery_groups()),
        PbrBundle {
            mesh: meshes.add(Cylinder::new(0.08, hoop.pole_height)),
            material: metal.clone(),
            ..default()
        },
    );
    let arm_len = (board_z - board.z) - pole_z;
    spawn_block(&mut commands, &mut registry, &mut meshes, metal.clone(),
        Transform::from_xyz(rim.x, hoop.pole_height - 0.1, pole_z + arm_len * 0.5),
        Vec3::new(0.06, 0.06, arm_len * 0.5), 0.3);

    // Rim: torus visual, ring of small balls as collider
    let rim_mat = mats.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.35, 0.10),
        metallic: 0.6,
        ..default()
    });
    let shapes = rim_points(hoop.rim_radius, hoop.rim_segments)
        .into_iter()
        .map(|pt| (pt, Quat::IDENTITY, Collider::ball(hoop.rim_thickness)))
        .collect::<Vec<_>>();
    let rim_pair = spawn_pair(
        &mut commands,
        &mut registry,
        Transform::from_translation(rim),
        (
            RigidBody::Fixed,
            Collider::compound(shapes),
            Restitution::coefficient(0.55),
            scenery_groups(),
        ),
        PbrBundle {
            mesh: meshes.add(Torus::new(hoop.rim_radius - hoop.rim_thickness, hoop.rim_radius + hoop.rim_thickness)),
            material: rim_mat,
            ..default()
        },
    );
    commands.entity(rim_pair.physics).insert(Rim);

    // Score sensor: trigger disc under the rim, physics only.
    commands.spawn((
        TransformBundle::from_transform(Transform::from_translation(rim - Vec3::Y * SENSOR_DROP)),
        RigidBody::Fixed,
        Collider::cylinder(0.01, hoop.rim_radius * 0.8),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        CollisionGroups::new(SCENERY_GROUP, BALL_GROUP),
        ScoreSensor,
    ));

    // Bench beside the court
    let wood = mats.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.35, 0.18),
        perceptual_roughness: 0.9,
        ..default()
    });
    let bench_at = Vec3::new(p - 1.2, 0.0, 1.5);
    let bench_rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    spawn_block(&mut commands, &mut registry, &mut meshes, wood.clone(),
        Transform::from_translation(bench_at + Vec3::Y * 0.45).with_rotation(bench_rot),
        Vec3::new(1.0, 0.04, 0.22), 0.2);
    for dz in [-0.85, 0.85] {
        spawn_block(&mut commands, &mut registry, &mut meshes, wood.clone(),
            Transform::from_translation(bench_at + Vec3::new(0.0, 0.21, dz)).with_rotation(bench_rot),
            Vec3::new(0.04, 0.21, 0.2), 0.2);
    }

    // Decorations: corner marker cones and a ball cart.
    let cone_mat = mats.add(Color::srgb(1.0, 0.45, 0.0));
    for (x, z) in [(-p + 0.5, -p + 0.5), (p - 0.5, -p + 0.5), (-p + 0.5, p - 0.5), (p - 0.5, p - 0.5)] {
        spawn_pair(
            &mut commands,
            &mut registry,
            Transform::from_xyz(x, 0.2, z),
            (RigidBody::Fixed, Collider::cone(0.2, 0.15), scenery_groups()),
            PbrBundle {
                mesh: meshes.add(Cone { radius: 0.15, height: 0.4 }),
                material: cone_mat.clone(),
                ..default()
            },
        );
    }
    spawn_block(&mut commands, &mut registry, &mut meshes, metal,
        Transform::from_xyz(-p + 1.0, 0.35, 2.0), Vec3::new(0.4, 0.35, 0.3), 0.2);

    info!("COURT built pairs={}", registry.len());
}
