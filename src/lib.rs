//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod config;

pub mod plugins {
    pub mod core_sim;
    pub mod sync;
    pub mod game_clock;
    pub mod game_state;
    pub mod input;
    pub mod ball;
    pub mod shooting;
    pub mod scoring;
    pub mod court;
    pub mod net;
    pub mod camera;
    pub mod lighting;
    pub mod hud;
    pub mod particles;
}
pub mod prelude;
