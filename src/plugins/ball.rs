// Ball spawning: debounced requests create a physics/visual pair at a random rack height.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::seq::SliceRandom;

use crate::config::{BallConfig, GameConfig};
use crate::plugins::court::BALL_GROUP;
use crate::plugins::game_state::{GameSession, RoundSet};
use crate::plugins::input::GameCommand;
use crate::plugins::sync::{spawn_pair, EntityRegistry};

/// Physics half of a basketball.
#[derive(Component)]
pub struct Ball;

/// Visual half of a basketball.
#[derive(Component)]
pub struct BallVisual;

/// Shared mesh + material for every ball.
#[derive(Resource, Default, Clone)]
pub struct BallAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BallSpawnedEvent {
    pub ball: Entity,
    pub pos: Vec3,
}

pub struct BallPlugin;
impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BallSpawnedEvent>()
            .add_systems(Startup, load_ball_assets)
            .add_systems(Update, handle_spawn_requests.in_set(RoundSet::Act));
    }
}

fn load_ball_assets(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    mats: Option<ResMut<Assets<StandardMaterial>>>,
    existing: Option<Res<BallAssets>>,
) {
    if existing.is_some() { return; }
    let (Some(mut meshes), Some(mut mats)) = (meshes, mats) else { return; };
    commands.insert_resource(BallAssets {
        mesh: meshes.add(Sphere::new(cfg.ball.radius).mesh().uv(32, 18)),
        material: mats.add(StandardMaterial {
            base_color: Color::srgb(0.90, 0.42, 0.12),
            perceptual_roughness: 0.8,
            ..default()
        }),
    });
}

/// Picks the spawn position: fixed horizontal point, random rack height.
pub fn spawn_position(cfg: &BallConfig, rng: &mut impl rand::Rng) -> Vec3 {
    let y = cfg.spawn_heights.choose(rng).copied().unwrap_or(cfg.radius * 4.0);
    Vec3::new(cfg.spawn_x, y, cfg.spawn_z)
}

fn handle_spawn_requests(
    mut commands: Commands,
    mut ev_cmd: EventReader<GameCommand>,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    assets: Option<Res<BallAssets>>,
    mut session: ResMut<GameSession>,
    mut registry: ResMut<EntityRegistry>,
    mut ev_spawned: EventWriter<BallSpawnedEvent>,
) {
    let Some(assets) = assets else { return; };
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    let mut rng = rand::thread_rng();
    for cmd in ev_cmd.read() {
        if *cmd != GameCommand::SpawnBall {
            continue;
        }
        if !session.try_begin_spawn(now_ms, cfg.round.spawn_debounce_ms) {
            debug!("BALL spawn ignored active={} t={now_ms:.0}ms", session.is_active());
            continue;
        }
        let pos = spawn_position(&cfg.ball, &mut rng);
        let pair = spawn_pair(
            &mut commands,
            &mut registry,
            Transform::from_translation(pos),
            (
                RigidBody::Dynamic,
                Collider::ball(cfg.ball.radius),
                ColliderMassProperties::Mass(cfg.ball.mass),
                Restitution::coefficient(cfg.ball.restitution),
                Friction::coefficient(cfg.ball.friction),
                ActiveEvents::COLLISION_EVENTS,
                CollisionGroups::new(BALL_GROUP, Group::ALL),
                Ccd::enabled(),
                Velocity::zero(),
                ExternalImpulse::default(),
                Ball,
            ),
            (
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material: assets.material.clone(),
                    ..default()
                },
                BallVisual,
            ),
        );
        session.add_ball(pair.physics);
        info!(
            "BALL spawn entity={:?} pos=({:.2},{:.2},{:.2}) waiting={}",
            pair.physics,
            pos.x,
            pos.y,
            pos.z,
            session.round.spawned_balls.len()
        );
        ev_spawned.send(BallSpawnedEvent { ball: pair.physics, pos });
    }
}
