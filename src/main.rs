use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};

use hoop_shot::prelude::*;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let mut app = App::new();
    app.insert_resource(ClearColor(LightMode::Day.settings().clear_color))
        .insert_resource(Msaa::Sample4)
        .insert_resource(AmbientLight {
            color: Color::srgb(0.55, 0.55, 0.60),
            brightness: LightMode::Day.settings().ambient_brightness,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hoop Shot".into(),
                canvas: Some("#hoop-shot-canvas".into()),
                fit_canvas_to_parent: true,
                prevent_default_event_handling: true,
                ..default()
            }),
            ..default()
        }))
        // Config must exist before any plugin's Startup systems read it.
        .insert_resource(GameConfig::load())
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(CoreSimPlugin)      // fixed step for physics + sim counters
        .add_plugins(GameStatePlugin)    // round state machine, clock, config, registry
        .add_plugins(SyncPlugin)         // physics -> visual pose copy
        .add_plugins(InputPlugin)        // keys + buttons -> commands
        .add_plugins(BallPlugin)         // debounced spawns
        .add_plugins(ShootingPlugin)     // charge/release + power bar
        .add_plugins(ScoringPlugin)      // sensor -> score
        .add_plugins(CourtPlugin)        // static world
        .add_plugins(NetPlugin)          // rope net under the rim
        .add_plugins(CameraPlugin)       // orbit camera + views
        .add_plugins(LightingPlugin)     // day/evening/night
        .add_plugins(ParticlePlugin)     // basket + shot FX
        .add_plugins(HudPlugin);         // score, countdown, history, buttons

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_plugins(FrameTimeDiagnosticsPlugin)
            .add_plugins(LogDiagnosticsPlugin::default());
    }

    app.run();
}
