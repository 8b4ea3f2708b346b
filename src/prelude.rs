//! Convenience re-exports for frequently used types & plugins.
pub use crate::config::GameConfig;
pub use crate::plugins::core_sim::{SimState, LogState, CoreSimPlugin, FIXED_DT};
pub use crate::plugins::sync::{EntityPair, EntityRegistry, Pose, PoseStore, SyncPlugin, VisualSyncSet};
pub use crate::plugins::game_clock::{ClockEvent, GameClock};
pub use crate::plugins::game_state::{
    GameSession, GameStatePlugin, launch_direction, shot_force, RoundEndedEvent, RoundPhase, RoundSet, RoundStartedEvent, ScoreHistory, ShotMode,
};
pub use crate::plugins::input::{CommandButton, GameCommand, InputPlugin};
pub use crate::plugins::ball::{Ball, BallAssets, BallPlugin, BallSpawnedEvent};
pub use crate::plugins::shooting::{ShootingPlugin, ShotFiredEvent};
pub use crate::plugins::scoring::{BasketScoredEvent, ScoreSensor, ScoringPlugin};
pub use crate::plugins::court::CourtPlugin;
pub use crate::plugins::net::NetPlugin;
pub use crate::plugins::camera::{CameraPlugin, CameraView};
pub use crate::plugins::lighting::{LightMode, LightingPlugin};
pub use crate::plugins::hud::HudPlugin;
pub use crate::plugins::particles::ParticlePlugin;
