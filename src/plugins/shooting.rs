// Shooting plugin.
// Responsible for: charge/release commands, applying the launch impulse to the
// oldest waiting ball, and the power gauge + bar UI while charging.
//
// Depends on:
//  - GameSession (game_state) for the FIFO ball rack and charge state
//  - ShotConfig (config) for the force curve and launch angle
//  - FIXED_DT (core_sim): the shot force acts for one physics step

use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;

use crate::config::GameConfig;
use crate::plugins::core_sim::FIXED_DT;
use crate::plugins::game_state::{launch_direction, shot_force, GameSession, RoundSet, ShotMode};
use crate::plugins::input::GameCommand;

#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFiredEvent {
    pub ball: Entity,
    pub pos: Vec3,
    /// Force magnitude before conversion to an impulse.
    pub force: f32,
    /// Charge fraction 0..1.
    pub power: f32,
}

#[derive(Component)]
pub struct PowerGauge;

#[derive(Component)]
pub struct PowerBar;
#[derive(Component)]
pub struct PowerBarFill;

pub struct ShootingPlugin;
impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShotFiredEvent>()
            .add_systems(Startup, spawn_power_ui)
            .add_systems(Update, handle_shot_commands.in_set(RoundSet::Act))
            .add_systems(Update, (update_power_gauge, update_power_bar).after(RoundSet::Act));
    }
}

// ---------------- Spawning ----------------

fn spawn_power_ui(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "Power: --",
            TextStyle { font_size: 22.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        PowerGauge,
    ));

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    right: Val::Px(12.0),
                    top: Val::Px(36.0),
                    width: Val::Px(180.0),
                    height: Val::Px(18.0),
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::FlexStart,
                    padding: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                background_color: Color::srgb(0.08, 0.08, 0.10).into(),
                ..default()
            },
            PowerBar,
        ))
        .with_children(|parent| {
            parent.spawn((
                NodeBundle {
                    style: Style {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    background_color: Color::srgb(0.15, 0.60, 0.25).into(),
                    ..default()
                },
                PowerBarFill,
            ));
        });
}

// ---------------- Systems ----------------

fn handle_shot_commands(
    mut commands: Commands,
    mut ev_cmd: EventReader<GameCommand>,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut session: ResMut<GameSession>,
    q_ball: Query<&Transform>,
    mut ev_shot: EventWriter<ShotFiredEvent>,
) {
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    for cmd in ev_cmd.read() {
        match cmd {
            GameCommand::ChargeShot => {
                if session.begin_charge(now_ms) {
                    debug!("SHOT charge start t={now_ms:.0}ms");
                } else {
                    debug!(
                        "SHOT charge ignored waiting={} charging={}",
                        session.round.spawned_balls.len(),
                        session.charge.is_charging()
                    );
                }
            }
            GameCommand::ReleaseShot => {
                let Some(release) = session.release_charge(now_ms, cfg.shot.max_charge_ms) else {
                    debug!("SHOT release ignored: no active charge");
                    continue;
                };
                let force = shot_force(release.charge_ms, &cfg.shot);
                let dir = launch_direction(cfg.shot.launch_angle_deg);
                let pos = q_ball.get(release.ball).map(|t| t.translation).unwrap_or_default();
                if let Some(mut ball) = commands.get_entity(release.ball) {
                    ball.insert(ExternalImpulse { impulse: dir * force * FIXED_DT, torque_impulse: Vec3::ZERO });
                }
                let power = if cfg.shot.max_charge_ms > 0.0 {
                    (release.charge_ms / cfg.shot.max_charge_ms) as f32
                } else {
                    1.0
                };
                info!(
                    "SHOT fire entity={:?} charge={:.0}ms force={:.1} waiting={}",
                    release.ball,
                    release.charge_ms,
                    force,
                    session.round.spawned_balls.len()
                );
                ev_shot.send(ShotFiredEvent { ball: release.ball, pos, force, power });
            }
            _ => {}
        }
    }
}

fn update_power_gauge(
    time: Res<Time>,
    session: Res<GameSession>,
    cfg: Res<GameConfig>,
    mut q: Query<&mut Text, With<PowerGauge>>,
) {
    let Ok(mut text) = q.get_single_mut() else { return; };
    match session.charge.mode {
        ShotMode::Idle => {
            if text.sections[0].value != "Power: --" {
                text.sections[0].value = "Power: --".to_string();
            }
        }
        ShotMode::Charging => {
            let fraction = session.charge.fraction(time.elapsed_seconds_f64() * 1000.0, cfg.shot.max_charge_ms);
            let force = cfg.shot.min_force + fraction * (cfg.shot.max_force - cfg.shot.min_force);
            text.sections[0].value = format!("Power: {:>3}% ({force:.0})", (fraction * 100.0) as u32);
        }
    }
}

/// Green -> yellow -> red as the bar fills.
pub fn power_bar_color(power: f32) -> Color {
    let power = power.clamp(0.0, 1.0);
    if power < 0.5 {
        let t = power / 0.5;
        Color::srgb(
            0.15 + (0.70 - 0.15) * t,
            0.60 + (0.85 - 0.60) * t,
            0.25 + (0.10 - 0.25) * t,
        )
    } else {
        let t = (power - 0.5) / 0.5;
        Color::srgb(
            0.70 + (0.90 - 0.70) * t,
            0.85 + (0.20 - 0.85) * t,
            0.10 + (0.15 - 0.10) * t,
        )
    }
}

fn update_power_bar(
    time: Res<Time>,
    session: Res<GameSession>,
    cfg: Res<GameConfig>,
    mut q_fill: Query<(&mut Style, &mut BackgroundColor), With<PowerBarFill>>,
) {
    let power = session.charge.fraction(time.elapsed_seconds_f64() * 1000.0, cfg.shot.max_charge_ms);
    if let Ok((mut style, mut color)) = q_fill.get_single_mut() {
        style.width = Val::Percent(power * 100.0);
        *color = power_bar_color(power).into();
    }
}
