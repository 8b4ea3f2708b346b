// Game configuration (RON) with defaults for every section.
use bevy::prelude::*;
use serde::Deserialize;

pub const CONFIG_PATH: &str = "assets/config/game.ron";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Vec3Def { pub x: f32, pub y: f32, pub z: f32 }
impl Vec3Def {
    pub const fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }
    pub fn to_vec3(self) -> Vec3 { Vec3::new(self.x, self.y, self.z) }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    pub duration_seconds: i32,
    pub spawn_debounce_ms: f64,
    pub popup_seconds: f32,
}
impl Default for RoundConfig {
    fn default() -> Self {
        Self { duration_seconds: 60, spawn_debounce_ms: 300.0, popup_seconds: 2.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShotConfig {
    pub min_force: f32,
    pub max_force: f32,
    pub max_charge_ms: f64,
    /// Launch elevation above the forward (-Z) horizontal.
    pub launch_angle_deg: f32,
}
impl Default for ShotConfig {
    fn default() -> Self {
        Self { min_force: 200.0, max_force: 500.0, max_charge_ms: 1000.0, launch_angle_deg: 55.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Horizontal spawn point; the height comes from `spawn_heights`.
    pub spawn_x: f32,
    pub spawn_z: f32,
    pub spawn_heights: Vec<f32>,
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 0.12,
            mass: 0.6,
            restitution: 0.8,
            friction: 0.5,
            spawn_x: 0.0,
            spawn_z: 0.0,
            spawn_heights: vec![1.6, 2.0, 2.4],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HoopConfig {
    /// Rim centre.
    pub rim_center: Vec3Def,
    pub rim_radius: f32,
    pub rim_thickness: f32,
    pub rim_segments: u32,
    pub backboard_size: Vec3Def,
    pub pole_height: f32,
}
impl Default for HoopConfig {
    fn default() -> Self {
        Self {
            rim_center: Vec3Def::new(0.0, 3.05, -4.6),
            rim_radius: 0.23,
            rim_thickness: 0.02,
            rim_segments: 16,
            backboard_size: Vec3Def::new(1.8, 1.05, 0.05),
            pole_height: 3.6,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NetConfig {
    pub rings: u32,
    pub segments: u32,
    pub ring_spacing: f32,
    /// Radius of the lowest ring relative to the rim.
    pub taper: f32,
    pub node_radius: f32,
    pub node_mass: f32,
}
impl Default for NetConfig {
    fn default() -> Self {
        Self { rings: 4, segments: 12, ring_spacing: 0.11, taper: 0.6, node_radius: 0.012, node_mass: 0.01 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CourtConfig {
    pub platform_half_extent: f32,
    pub ground_half_extent: f32,
    pub wall_height: f32,
    pub floor_texture: Option<String>,
    pub backboard_texture: Option<String>,
}
impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            platform_half_extent: 7.5,
            ground_half_extent: 40.0,
            wall_height: 2.5,
            floor_texture: None,
            backboard_texture: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub damping: f32,
    pub zoom_speed: f32,
    pub sensitivity: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_deg: 60.0, damping: 0.1, zoom_speed: 0.5, sensitivity: 0.005 }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub shot: ShotConfig,
    pub ball: BallConfig,
    pub hoop: HoopConfig,
    pub net: NetConfig,
    pub court: CourtConfig,
    pub camera: CameraConfig,
}

impl GameConfig {
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Reads the bundled config. Falls back to defaults (logged) when the file
    /// is missing or malformed.
    pub fn load() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let data = include_str!("../assets/config/game.ron");
            return Self::from_ron(data).unwrap_or_else(|e| {
                error!("CONFIG parse failed (embedded) error={e}");
                Self::default()
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            match std::fs::read_to_string(CONFIG_PATH) {
                Ok(data) => match Self::from_ron(&data) {
                    Ok(cfg) => {
                        info!("CONFIG loaded path={CONFIG_PATH}");
                        cfg
                    }
                    Err(e) => {
                        error!("CONFIG parse failed path={CONFIG_PATH} error={e}");
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("CONFIG read failed path={CONFIG_PATH} error={e}; using defaults");
                    Self::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shot_table() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.shot.min_force, 200.0);
        assert_eq!(cfg.shot.max_force, 500.0);
        assert_eq!(cfg.shot.max_charge_ms, 1000.0);
        assert_eq!(cfg.round.spawn_debounce_ms, 300.0);
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let cfg = GameConfig::from_ron("(round: (duration_seconds: 30))").unwrap();
        assert_eq!(cfg.round.duration_seconds, 30);
        assert_eq!(cfg.round.spawn_debounce_ms, 300.0);
        assert_eq!(cfg.ball, BallConfig::default());
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(GameConfig::from_ron("(round: (duration_seconds: \"soon\"))").is_err());
    }

    #[test]
    fn bundled_config_parses() {
        let data = include_str!("../assets/config/game.ron");
        let cfg = GameConfig::from_ron(data).unwrap();
        assert!(!cfg.ball.spawn_heights.is_empty());
        assert!(cfg.shot.max_force > cfg.shot.min_force);
    }
}
