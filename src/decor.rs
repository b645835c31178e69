//! Decorative model
//!
//! The secondary model revealed while a book is presented. Purely cosmetic:
//! a fixed pose from the shelf config, visible only in the Selected state,
//! and rendered as nothing at all until its mesh resolves.

use crate::carousel::Pose;
use crate::config::DecorSpec;
use macroquad::math::vec3;

pub struct Decor {
    /// Mesh path, or `None` when the shelf has no decor entry.
    pub mesh: Option<String>,
    pub pose: Pose,
    pub scale: f32,
}

impl Decor {
    pub fn from_spec(spec: Option<&DecorSpec>) -> Self {
        match spec {
            Some(spec) => Self {
                mesh: Some(spec.mesh.clone()),
                pose: Pose {
                    position: vec3(spec.position[0], spec.position[1], spec.position[2]),
                    yaw: spec.yaw,
                },
                scale: spec.scale,
            },
            None => Self {
                mesh: None,
                pose: Pose {
                    position: vec3(0.0, 0.0, 0.0),
                    yaw: 0.0,
                },
                scale: 1.0,
            },
        }
    }
}
