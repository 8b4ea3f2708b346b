use hoop_shot::prelude::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{RapierConfiguration, TimestepMode};

// Helper to build a minimal app (no assets/scene) for deterministic fixed tick tests.
fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin); // provides tick_state system in FixedUpdate
    app
}

#[test]
fn ticks_advance() {
    let mut app = build_app();
    // Directly run FixedUpdate schedule 5 times (bypasses time driver).
    for _ in 0..5 { app.world_mut().run_schedule(FixedUpdate); }
    let sim = app.world().get_resource::<SimState>().unwrap();
    assert_eq!(sim.tick, 5, "expected tick to be 5 after 5 fixed steps");
    assert!((sim.elapsed_seconds - (5.0/60.0)).abs() < 1e-6);
    assert_eq!(sim.round_ticks, 0, "no session, no round ticks");
}

#[test]
fn round_ticks_follow_session() {
    let mut app = build_app();
    let mut session = GameSession::default();
    assert!(session.start_round(30));
    app.insert_resource(session);
    for _ in 0..3 { app.world_mut().run_schedule(FixedUpdate); }
    let sim = app.world().resource::<SimState>();
    assert_eq!(sim.round_ticks, 3);
}

#[test]
fn physics_step_is_fixed() {
    let mut app = build_app();
    // Rapier's own default: a variable step following the frame delta.
    app.insert_resource(RapierConfiguration::new(1.0));
    assert!(matches!(
        app.world().resource::<RapierConfiguration>().timestep_mode,
        TimestepMode::Variable { .. }
    ));
    app.update();
    let mode = &app.world().resource::<RapierConfiguration>().timestep_mode;
    assert!(
        matches!(mode, TimestepMode::Fixed { dt, substeps: 1 } if (*dt - FIXED_DT).abs() < 1e-9),
        "physics must step by FIXED_DT once per frame"
    );
}
