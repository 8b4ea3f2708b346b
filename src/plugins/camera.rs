use bevy::prelude::*;
use bevy::input::mouse::{MouseMotion, MouseWheel};

use crate::config::GameConfig;
use crate::plugins::input::GameCommand;

/// Marker component for the single orbit camera.
#[derive(Component)]
pub struct OrbitCamera;

/// Preset viewpoints selectable with keys 1-3 or the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraView {
    /// Behind the shooter, looking down the court at the hoop.
    #[default]
    Sideline,
    /// Beside the hoop, looking across the lane.
    Baseline,
    /// High above mid-court.
    Overhead,
}

impl CameraView {
    pub const ALL: [CameraView; 3] = [CameraView::Sideline, CameraView::Baseline, CameraView::Overhead];

    pub fn label(self) -> &'static str {
        match self {
            CameraView::Sideline => "View 1",
            CameraView::Baseline => "View 2",
            CameraView::Overhead => "View 3",
        }
    }

    /// Orbit goal (yaw, pitch, radius) around the focus point.
    pub fn orbit(self) -> (f32, f32, f32) {
        match self {
            CameraView::Sideline => (0.0, 12f32.to_radians(), 7.5),
            CameraView::Baseline => (80f32.to_radians(), 18f32.to_radians(), 6.0),
            CameraView::Overhead => (0.0, 70f32.to_radians(), 11.0),
        }
    }
}

/// Orbit controls: the camera eases from its current angles toward the goal by a
/// fixed damping fraction every frame.
#[derive(Resource, Debug, Clone)]
pub struct OrbitControls {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub goal_yaw: f32,
    pub goal_pitch: f32,
    pub goal_radius: f32,
    pub damping: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        let (yaw, pitch, radius) = CameraView::default().orbit();
        Self {
            focus: Vec3::new(0.0, 1.6, -2.3),
            yaw,
            pitch,
            radius,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_radius: radius,
            damping: 0.1,
            pitch_min: (-5f32).to_radians(),
            pitch_max: 85f32.to_radians(),
            radius_min: 2.0,
            radius_max: 20.0,
        }
    }
}

impl OrbitControls {
    pub fn set_view(&mut self, view: CameraView) {
        let (yaw, pitch, radius) = view.orbit();
        self.goal_yaw = yaw;
        self.goal_pitch = pitch;
        self.goal_radius = radius;
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.goal_yaw += d_yaw;
        self.goal_pitch = (self.goal_pitch + d_pitch).clamp(self.pitch_min, self.pitch_max);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.goal_radius = (self.goal_radius - delta).clamp(self.radius_min, self.radius_max);
    }

    /// One damping step.
    pub fn advance(&mut self) {
        let k = self.damping.clamp(0.0, 1.0);
        self.yaw += (self.goal_yaw - self.yaw) * k;
        self.pitch += (self.goal_pitch - self.pitch) * k;
        self.radius += (self.goal_radius - self.radius) * k;
    }

    pub fn eye(&self) -> Vec3 {
        let rot = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(-self.pitch);
        self.focus + rot * (Vec3::Z * self.radius)
    }
}

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, (
                apply_view_commands,
                orbit_camera_input,
                orbit_camera_apply,
            ).chain());
    }
}

fn spawn_camera(mut commands: Commands, cfg: Res<GameConfig>) {
    let controls = OrbitControls { damping: cfg.camera.damping, ..default() };
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(controls.eye()).looking_at(controls.focus, Vec3::Y),
            projection: PerspectiveProjection {
                fov: cfg.camera.fov_deg.to_radians(),
                near: 0.05,
                far: 500.0,
                ..default()
            }.into(),
            ..default()
        },
        OrbitCamera,
    ));
    commands.insert_resource(controls);
}

fn apply_view_commands(
    mut ev_cmd: EventReader<GameCommand>,
    mut controls: Option<ResMut<OrbitControls>>,
) {
    for cmd in ev_cmd.read() {
        let GameCommand::SetView(view) = cmd else { continue; };
        if let Some(controls) = controls.as_mut() {
            controls.set_view(*view);
        }
        info!("CAMERA view={:?}", view);
    }
}

/// Right mouse drag orbits, wheel zooms.
fn orbit_camera_input(
    cfg: Res<GameConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut ev_motion: EventReader<MouseMotion>,
    mut ev_wheel: EventReader<MouseWheel>,
    controls: Option<ResMut<OrbitControls>>,
) {
    let Some(mut controls) = controls else { return; };
    for w in ev_wheel.read() {
        controls.zoom(w.y * cfg.camera.zoom_speed);
    }
    if buttons.pressed(MouseButton::Right) {
        for m in ev_motion.read() {
            controls.rotate(-m.delta.x * cfg.camera.sensitivity, m.delta.y * cfg.camera.sensitivity);
        }
    } else {
        ev_motion.clear();
    }
}

/// Frame loop step 1: advance damping and place the camera.
fn orbit_camera_apply(
    controls: Option<ResMut<OrbitControls>>,
    mut q_cam: Query<&mut Transform, With<OrbitCamera>>,
) {
    let Some(mut controls) = controls else { return; };
    controls.advance();
    let Ok(mut cam_t) = q_cam.get_single_mut() else { return; };
    cam_t.translation = controls.eye();
    cam_t.look_at(controls.focus, Vec3::Y);
}
