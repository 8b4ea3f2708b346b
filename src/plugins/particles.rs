// Particle FX: confetti burst under the rim on a basket, small puffs when a ball is
// racked or shot.
use bevy::prelude::*;
use rand::prelude::*;

use crate::plugins::ball::BallSpawnedEvent;
use crate::plugins::scoring::BasketScoredEvent;
use crate::plugins::shooting::ShotFiredEvent;

pub struct ParticlePlugin;

#[derive(Component)]
struct Particle {
    lifetime: f32,
    age: f32,
    gravity: f32,
    vel: Vec3,
    start_scale: Vec3,
    end_scale: Vec3,
}

/// Shared unit sphere and a small palette for every particle.
#[derive(Resource)]
pub struct ParticleAssets {
    mesh: Handle<Mesh>,
    confetti: Vec<Handle<StandardMaterial>>,
    puff: Handle<StandardMaterial>,
}

impl FromWorld for ParticleAssets {
    fn from_world(world: &mut World) -> Self {
        let mesh = world.resource_mut::<Assets<Mesh>>().add(Sphere::new(1.0).mesh().uv(12, 8));
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let confetti = [
            Color::srgb(1.0, 0.35, 0.10),
            Color::srgb(1.0, 0.85, 0.15),
            Color::srgb(0.20, 0.65, 1.0),
            Color::srgb(0.95, 0.95, 0.95),
        ]
        .into_iter()
        .map(|c| materials.add(StandardMaterial { base_color: c, unlit: true, ..default() }))
        .collect();
        let puff = materials.add(StandardMaterial {
            base_color: Color::srgba(0.85, 0.80, 0.70, 0.45),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            ..default()
        });
        Self { mesh, confetti, puff }
    }
}

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParticleAssets>()
            .add_systems(Update, (spawn_basket_burst, spawn_rack_puff, spawn_shot_puff, update_particles));
    }
}

/// Random direction in the upper hemisphere, biased upward by `lift`.
fn upward_dir(rng: &mut impl Rng, lift: f32) -> Vec3 {
    loop {
        let d = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(-1.0..1.0));
        if d.length_squared() > 0.05 {
            return (d.normalize() + Vec3::Y * lift).normalize();
        }
    }
}

fn spawn_basket_burst(
    mut ev: EventReader<BasketScoredEvent>,
    mut commands: Commands,
    assets: Res<ParticleAssets>,
) {
    for e in ev.read() {
        let mut rng = thread_rng();
        for _ in 0..48 {
            let mut dir = upward_dir(&mut rng, 0.2);
            dir.y = -dir.y * 0.5;
            let scale = rng.gen_range(0.015..0.03);
            let material = assets.confetti.choose(&mut rng).cloned().unwrap_or_default();
            commands.spawn((
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material,
                    transform: Transform::from_translation(e.pos).with_scale(Vec3::splat(scale)),
                    ..default()
                },
                Particle {
                    lifetime: rng.gen_range(0.6..1.1),
                    age: 0.0,
                    gravity: -6.0,
                    vel: dir * rng.gen_range(1.0..2.5),
                    start_scale: Vec3::splat(scale),
                    end_scale: Vec3::splat(scale * 0.3),
                },
            ));
        }
    }
}

fn spawn_rack_puff(
    mut ev: EventReader<BallSpawnedEvent>,
    mut commands: Commands,
    assets: Res<ParticleAssets>,
) {
    for e in ev.read() {
        let mut rng = thread_rng();
        for _ in 0..6 {
            let dir = upward_dir(&mut rng, 0.6);
            let scale = rng.gen_range(0.015..0.025);
            commands.spawn((
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material: assets.puff.clone(),
                    transform: Transform::from_translation(e.pos).with_scale(Vec3::splat(scale)),
                    ..default()
                },
                Particle {
                    lifetime: rng.gen_range(0.25..0.4),
                    age: 0.0,
                    gravity: 0.0,
                    vel: dir * rng.gen_range(0.3..0.6),
                    start_scale: Vec3::splat(scale),
                    end_scale: Vec3::splat(scale * 1.5),
                },
            ));
        }
    }
}

fn spawn_shot_puff(
    mut ev: EventReader<ShotFiredEvent>,
    mut commands: Commands,
    assets: Res<ParticleAssets>,
) {
    for e in ev.read() {
        let mut rng = thread_rng();
        // Scale count with shot power (power 0..1)
        let count = (6.0 + e.power * 14.0).round() as usize;
        for _ in 0..count {
            let dir = upward_dir(&mut rng, 0.35);
            let scale = rng.gen_range(0.02..0.04);
            commands.spawn((
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material: assets.puff.clone(),
                    transform: Transform::from_translation(e.pos).with_scale(Vec3::splat(scale)),
                    ..default()
                },
                Particle {
                    lifetime: rng.gen_range(0.3..0.6),
                    age: 0.0,
                    gravity: -2.0,
                    vel: dir * rng.gen_range(0.6..1.4) * (0.5 + e.power),
                    start_scale: Vec3::splat(scale),
                    end_scale: Vec3::splat(scale * 2.0),
                },
            ));
        }
    }
}

fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_seconds();
    for (e, mut t, mut p) in &mut q {
        p.age += dt;
        if p.age >= p.lifetime {
            commands.entity(e).despawn_recursive();
            continue;
        }
        p.vel.y += p.gravity * dt;
        t.translation += p.vel * dt;
        let progress = (p.age / p.lifetime).clamp(0.0, 1.0);
        t.scale = p.start_scale.lerp(p.end_scale, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_dir_is_unit_and_up() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let d = upward_dir(&mut rng, 0.35);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.y >= 0.0);
        }
    }

    #[test]
    fn racked_ball_puffs_then_fades() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(ParticleAssets {
                mesh: Handle::default(),
                confetti: Vec::new(),
                puff: Handle::default(),
            })
            .add_event::<BallSpawnedEvent>()
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(std::time::Duration::from_millis(100)))
            .add_systems(Update, (spawn_rack_puff, update_particles).chain());
        app.update();
        app.world_mut().send_event(BallSpawnedEvent { ball: Entity::from_raw(1), pos: Vec3::Y });

        app.update();
        let mut q = app.world_mut().query::<&Particle>();
        assert_eq!(q.iter(app.world()).count(), 6);

        for _ in 0..6 {
            app.update();
        }
        let mut q = app.world_mut().query::<&Particle>();
        assert_eq!(q.iter(app.world()).count(), 0);
    }
}
