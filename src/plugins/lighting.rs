// Light modes: sun + ambient by day, warm low sun in the evening, hoop spot lights at night.
use bevy::prelude::*;

use crate::config::GameConfig;
use crate::plugins::input::GameCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Resource)]
pub enum LightMode {
    #[default]
    Day,
    Evening,
    Night,
}

impl LightMode {
    pub const ALL: [LightMode; 3] = [LightMode::Day, LightMode::Evening, LightMode::Night];

    pub fn next(self) -> Self {
        match self {
            LightMode::Day => LightMode::Evening,
            LightMode::Evening => LightMode::Night,
            LightMode::Night => LightMode::Day,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LightMode::Day => "Day",
            LightMode::Evening => "Evening",
            LightMode::Night => "Night",
        }
    }

    pub fn settings(self) -> LightSettings {
        match self {
            LightMode::Day => LightSettings {
                sun_illuminance: 12_000.0,
                sun_color: Color::WHITE,
                ambient_brightness: 600.0,
                spots_on: false,
                clear_color: Color::srgb(0.52, 0.80, 0.92),
            },
            LightMode::Evening => LightSettings {
                sun_illuminance: 3_500.0,
                sun_color: Color::srgb(1.0, 0.70, 0.45),
                ambient_brightness: 250.0,
                spots_on: true,
                clear_color: Color::srgb(0.85, 0.50, 0.35),
            },
            LightMode::Night => LightSettings {
                sun_illuminance: 0.0,
                sun_color: Color::srgb(0.6, 0.7, 1.0),
                ambient_brightness: 60.0,
                spots_on: true,
                clear_color: Color::srgb(0.02, 0.03, 0.08),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSettings {
    pub sun_illuminance: f32,
    pub sun_color: Color,
    pub ambient_brightness: f32,
    pub spots_on: bool,
    pub clear_color: Color,
}

#[derive(Component)]
pub struct Sun;

#[derive(Component)]
pub struct CourtSpot;

pub struct LightingPlugin;
impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LightMode>()
            .add_systems(Startup, spawn_lights)
            .add_systems(Update, (apply_light_commands, apply_light_mode).chain());
    }
}

fn spawn_lights(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: LightMode::Day.settings().sun_illuminance,
                shadows_enabled: true,
                ..default()
            },
            transform: Transform::from_xyz(8.0, 14.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        Sun,
    ));

    let rim = cfg.hoop.rim_center.to_vec3();
    for x in [-4.0, 4.0] {
        commands.spawn((
            SpotLightBundle {
                spot_light: SpotLight {
                    intensity: 400_000.0,
                    range: 25.0,
                    outer_angle: 0.6,
                    inner_angle: 0.3,
                    shadows_enabled: true,
                    ..default()
                },
                transform: Transform::from_xyz(x, 7.0, rim.z + 4.0).looking_at(Vec3::new(0.0, 0.0, rim.z + 1.0), Vec3::Y),
                visibility: Visibility::Hidden,
                ..default()
            },
            CourtSpot,
        ));
    }
}

fn apply_light_commands(mut ev_cmd: EventReader<GameCommand>, mut mode: ResMut<LightMode>) {
    for cmd in ev_cmd.read() {
        let next = match cmd {
            GameCommand::SetLight(m) => *m,
            GameCommand::CycleLight => mode.next(),
            _ => continue,
        };
        if *mode != next {
            info!("LIGHT mode={}", next.label());
            *mode = next;
        }
    }
}

fn apply_light_mode(
    mode: Res<LightMode>,
    mut ambient: ResMut<AmbientLight>,
    mut clear: ResMut<ClearColor>,
    mut q_sun: Query<&mut DirectionalLight, With<Sun>>,
    mut q_spots: Query<&mut Visibility, With<CourtSpot>>,
) {
    if !mode.is_changed() {
        return;
    }
    let s = mode.settings();
    ambient.brightness = s.ambient_brightness;
    clear.0 = s.clear_color;
    for mut sun in &mut q_sun {
        sun.illuminance = s.sun_illuminance;
        sun.color = s.sun_color;
    }
    for mut vis in &mut q_spots {
        *vis = if s.spots_on { Visibility::Visible } else { Visibility::Hidden };
    }
}
