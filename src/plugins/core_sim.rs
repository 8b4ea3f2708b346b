use bevy::prelude::*;
use bevy::time::Fixed;
use bevy_rapier3d::prelude::{RapierConfiguration, TimestepMode};

use crate::plugins::game_state::GameSession;

/// Physics step length. The step is taken once per rendered frame regardless of
/// the real frame delta, so simulation speed follows the display refresh rate.
pub const FIXED_DT: f32 = 1.0 / 60.0;

// Core simulation timing shared by gameplay and diagnostics.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
    /// Ticks spent inside an active round.
    pub round_ticks: u64,
}
impl SimState {
    pub fn advance_fixed(&mut self, round_active: bool) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 * FIXED_DT;
        if round_active {
            self.round_ticks += 1;
        }
    }
}

#[derive(Resource, Default)]
pub struct LogState { pub last_logged_second: u64 }

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .insert_resource(LogState::default())
            .insert_resource(Time::<Fixed>::from_seconds(FIXED_DT as f64))
            .add_systems(Startup, fix_physics_step)
            .add_systems(FixedUpdate, (tick_state, log_each_second).chain());
    }
}

/// The physics step used for every frame.
pub fn physics_timestep() -> TimestepMode {
    TimestepMode::Fixed { dt: FIXED_DT, substeps: 1 }
}

// Rapier defaults to a variable step; pin it to FIXED_DT once the plugin has
// inserted its configuration.
fn fix_physics_step(config: Option<ResMut<RapierConfiguration>>) {
    let Some(mut config) = config else {
        warn!("PHYSICS no RapierConfiguration; step left unchanged");
        return;
    };
    config.timestep_mode = physics_timestep();
    info!("PHYSICS timestep fixed dt={FIXED_DT:.5} substeps=1");
}

fn tick_state(mut sim: ResMut<SimState>, session: Option<Res<GameSession>>) {
    let active = session.map(|s| s.is_active()).unwrap_or(false);
    sim.advance_fixed(active);
}

fn log_each_second(sim: Res<SimState>, mut log_state: ResMut<LogState>, session: Option<Res<GameSession>>) {
    if sim.tick == 0 || sim.tick % 60 != 0 { return; }
    let current_second = sim.tick / 60;
    if current_second == log_state.last_logged_second { return; }
    log_state.last_logged_second = current_second;
    let Some(session) = session else { return; };
    if session.is_active() {
        debug!(
            "T+{}s tick={} score={} remaining={} waiting={} in_flight={}",
            current_second,
            sim.tick,
            session.round.score,
            session.round.remaining_seconds,
            session.round.spawned_balls.len(),
            session.round.shot_balls.len()
        );
    }
}
