use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::{CollisionEvent, ExternalImpulse};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
use hoop_shot::prelude::*;

// Minimal app with gameplay plugins only (no renderer, no physics engine).
// Time advances by `step` on every update.
fn build_app(step: Duration, duration_seconds: i32) -> App {
    let mut app = App::new();
    let mut cfg = GameConfig::default();
    cfg.round.duration_seconds = duration_seconds;
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(cfg)
        .insert_resource(BallAssets::default())
        .init_resource::<ButtonInput<KeyCode>>()
        .add_event::<CollisionEvent>()
        .add_plugins((GameStatePlugin, InputPlugin, BallPlugin, ShootingPlugin, ScoringPlugin));
    // Steps longer than the default 250 ms clamp must reach gameplay unchanged.
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(Duration::from_secs(5));
    // First update only initialises the time source.
    app.update();
    app
}

fn send(app: &mut App, cmd: GameCommand) {
    app.world_mut().send_event(cmd);
}

fn session(app: &App) -> &GameSession {
    app.world().resource::<GameSession>()
}

#[test]
fn debounce_100ms_spawns_one_ball() {
    let mut app = build_app(Duration::from_millis(100), 60);
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    assert_eq!(session(&app).round.spawned_balls.len(), 1);
}

#[test]
fn debounce_350ms_spawns_two_balls() {
    let mut app = build_app(Duration::from_millis(350), 60);
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    assert_eq!(session(&app).round.spawned_balls.len(), 2);
}

#[test]
fn spawn_before_start_is_ignored() {
    let mut app = build_app(Duration::from_millis(500), 60);
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    assert!(session(&app).round.spawned_balls.is_empty());
    assert!(app.world().resource::<EntityRegistry>().is_empty());
}

#[test]
fn round_end_despawns_every_ball() {
    let mut app = build_app(Duration::from_millis(500), 2);
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    let pairs: Vec<_> = app.world().resource::<EntityRegistry>().pairs().to_vec();
    assert_eq!(pairs.len(), 2);

    // 2 s round expires once remaining drops below zero (3 s of ticks).
    for _ in 0..10 {
        app.update();
    }
    let s = session(&app);
    assert!(!s.is_active());
    assert!(s.round.spawned_balls.is_empty());
    assert_eq!(s.history.len(), 1);
    assert!(app.world().resource::<EntityRegistry>().is_empty());
    for pair in pairs {
        assert!(app.world().get_entity(pair.physics).is_none());
        assert!(app.world().get_entity(pair.visual).is_none());
    }
}

#[test]
fn start_during_round_keeps_clock() {
    let mut app = build_app(Duration::from_millis(500), 30);
    send(&mut app, GameCommand::StartRound);
    app.update();
    for _ in 0..4 {
        app.update();
    }
    let before = session(&app).round.remaining_seconds;
    assert!(before < 30);
    send(&mut app, GameCommand::StartRound);
    app.update();
    let after = session(&app).round.remaining_seconds;
    assert!(after <= before, "restart must not reset the countdown");
    assert_eq!(session(&app).history.len(), 0);
}

#[test]
fn sensor_collision_scores_only_round_balls() {
    let mut app = build_app(Duration::from_millis(400), 60);
    let sensor = app.world_mut().spawn((Transform::default(), ScoreSensor)).id();
    let stranger = app.world_mut().spawn_empty().id();
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    let ball = session(&app).round.spawned_balls[0];

    app.world_mut().send_event(CollisionEvent::Started(sensor, ball, CollisionEventFlags::SENSOR));
    app.world_mut().send_event(CollisionEvent::Started(stranger, sensor, CollisionEventFlags::SENSOR));
    app.update();
    assert_eq!(session(&app).round.score, 1);
}

#[test]
fn collision_after_round_end_is_ignored() {
    let mut app = build_app(Duration::from_millis(500), 1);
    let sensor = app.world_mut().spawn((Transform::default(), ScoreSensor)).id();
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    let ball = session(&app).round.spawned_balls[0];
    for _ in 0..6 {
        app.update();
    }
    assert!(!session(&app).is_active());

    app.world_mut().send_event(CollisionEvent::Started(ball, sensor, CollisionEventFlags::SENSOR));
    app.update();
    assert_eq!(session(&app).round.score, 0);
    assert_eq!(session(&app).history.in_play_order(), &[0]);
}

#[test]
fn release_pushes_oldest_ball() {
    let mut app = build_app(Duration::from_millis(350), 60);
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    send(&mut app, GameCommand::SpawnBall);
    app.update();
    let first = session(&app).round.spawned_balls[0];
    let second = session(&app).round.spawned_balls[1];

    send(&mut app, GameCommand::ChargeShot);
    app.update();
    assert!(session(&app).charge.is_charging());
    send(&mut app, GameCommand::ReleaseShot);
    app.update();

    // One 350 ms frame between charge and release.
    let cfg = GameConfig::default();
    let expected = launch_direction(cfg.shot.launch_angle_deg) * shot_force(350.0, &cfg.shot) * FIXED_DT;
    let impulse = app.world().get::<ExternalImpulse>(first).map(|i| i.impulse).unwrap_or_default();
    assert!((impulse - expected).length() < 1e-3, "impulse {impulse:?} != {expected:?}");
    assert_eq!(app.world().get::<ExternalImpulse>(second).map(|i| i.impulse), Some(Vec3::ZERO));

    let s = session(&app);
    assert_eq!(s.round.spawned_balls.iter().copied().collect::<Vec<_>>(), vec![second]);
    assert_eq!(s.round.shot_balls, vec![first]);
    assert!(!s.charge.is_charging());
}

#[test]
fn shoot_without_balls_changes_nothing() {
    let mut app = build_app(Duration::from_millis(350), 60);
    send(&mut app, GameCommand::StartRound);
    app.update();
    send(&mut app, GameCommand::ChargeShot);
    app.update();
    send(&mut app, GameCommand::ReleaseShot);
    app.update();
    let s = session(&app);
    assert!(!s.charge.is_charging());
    assert!(s.round.shot_balls.is_empty());
    assert!(app.world().resource::<Events<ShotFiredEvent>>().is_empty());
    assert!(app.world().resource::<EntityRegistry>().is_empty());
}
