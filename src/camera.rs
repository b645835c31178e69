//! Orbit camera
//!
//! Azimuth/elevation/distance orbit around the ring centre, driven by mouse
//! drag. Elevation is clamped to a narrow band around the horizon; pan and
//! zoom stay off. While `enabled` is false (any state but Browsing) drag
//! input is ignored entirely.

use macroquad::camera::Camera3D;
use macroquad::input::{is_mouse_button_down, mouse_position, MouseButton};
use macroquad::math::{vec2, Vec2, Vec3};
use std::f32::consts::PI;

/// Radians of camera rotation per pixel of drag
const DRAG_SENSITIVITY: f32 = 0.005;
/// How far above/below the horizon the camera may tilt
const ELEVATION_BAND: f32 = 0.35;

pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub fovy: f32,
    pub enabled: bool,
    last_mouse: Option<Vec2>,
}

impl OrbitCamera {
    /// Camera starting on +Z, level with the ring, looking at `target`.
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            azimuth: PI,
            elevation: 0.0,
            fovy: 65.0_f32.to_radians(),
            enabled: true,
            last_mouse: None,
        }
    }

    /// Apply a drag delta in pixels. No-op while disabled.
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.azimuth += dx * DRAG_SENSITIVITY;
        self.elevation =
            (self.elevation + dy * DRAG_SENSITIVITY).clamp(-ELEVATION_BAND, ELEVATION_BAND);
    }

    /// Read mouse input for this frame and orbit accordingly.
    pub fn update(&mut self) {
        if !self.enabled || !is_mouse_button_down(MouseButton::Left) {
            self.last_mouse = None;
            return;
        }

        let (mx, my) = mouse_position();
        let mouse = vec2(mx, my);
        if let Some(last) = self.last_mouse {
            let delta = mouse - last;
            self.apply_drag(delta.x, delta.y);
        }
        self.last_mouse = Some(mouse);
    }

    /// Direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        let (pitch, yaw) = (self.elevation, self.azimuth);
        Vec3::new(
            pitch.cos() * yaw.sin(),
            -pitch.sin(),
            pitch.cos() * yaw.cos(),
        )
    }

    /// World position, behind the target along the look direction.
    pub fn position(&self) -> Vec3 {
        self.target - self.forward() * self.distance
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            target: self.target,
            up: Vec3::Y,
            fovy: self.fovy,
            ..Default::default()
        }
    }
}
