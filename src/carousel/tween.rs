//! Explicit tween records
//!
//! Each animated item carries a `{from, to, start_time, duration, easing}`
//! record owned by the selection machine. The per-frame tick samples the
//! tween and writes the result into the item's current pose, so there is no
//! external stateful tweening engine to get out of sync with.

use super::Pose;
use serde::{Deserialize, Serialize};

/// Easing function applied to the normalized time `t` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Fast start, gentle settle.
    #[default]
    CubicOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A pose animation in flight. Times are seconds on the render clock
/// (`macroquad::time::get_time`).
#[derive(Debug, Clone, Copy)]
pub struct PoseTween {
    pub from: Pose,
    pub to: Pose,
    pub start_time: f64,
    pub duration: f32,
    pub easing: Easing,
}

impl PoseTween {
    pub fn new(from: Pose, to: Pose, start_time: f64, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
            easing,
        }
    }

    /// Normalized progress in [0, 1], clamped at both ends. A zero duration
    /// counts as already finished.
    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.start_time) as f32;
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Sample the pose at time `now`.
    pub fn sample(&self, now: f64) -> Pose {
        let t = self.easing.apply(self.progress(now));
        Pose {
            position: self.from.position.lerp(self.to.position, t),
            yaw: lerp(self.from.yaw, self.to.yaw, t),
        }
    }

    pub fn is_complete(&self, now: f64) -> bool {
        now >= self.start_time + self.duration as f64
    }
}
