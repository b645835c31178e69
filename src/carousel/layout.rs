//! Circular item layout
//!
//! Pure math mapping (index, count, radius) to a spot on the ring and a yaw
//! that keeps the item's cover facing the ring centre. No side effects; the
//! carousel recomputes this only when the book count or radius changes.

use macroquad::math::{vec3, Vec3};
use std::f32::consts::TAU;

/// A computed spot on the ring: world position plus yaw about the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub yaw: f32,
}

/// Compute the placement for one item.
///
/// Angular spacing is `2π / count`; `offset` is the global ring rotation.
/// `yaw = -angle` so the rotated forward axis points at the origin.
///
/// Preconditions: `index < count`, `radius > 0`. Neither is checked here;
/// `ring` handles the `count == 0` case by producing an empty layout.
pub fn placement(index: usize, count: usize, radius: f32, offset: f32) -> Placement {
    let spacing = TAU / count as f32;
    let angle = index as f32 * spacing + offset;

    Placement {
        position: vec3(radius * angle.cos(), 0.0, radius * angle.sin()),
        yaw: -angle,
    }
}

/// Compute placements for a whole ring. `count == 0` yields an empty vec.
pub fn ring(count: usize, radius: f32, offset: f32) -> Vec<Placement> {
    (0..count)
        .map(|i| placement(i, count, radius, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    /// Local forward axis of an unrotated item. An item at angle 0 sits at
    /// (radius, 0, 0) and its cover must look back at the origin, i.e. along -X.
    const ITEM_FORWARD: Vec3 = vec3(-1.0, 0.0, 0.0);

    fn rotate_y(v: Vec3, yaw: f32) -> Vec3 {
        let (sin, cos) = yaw.sin_cos();
        vec3(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
    }

    #[test]
    fn test_positions_lie_on_circle() {
        for count in [1, 2, 3, 8, 13] {
            for radius in [1.0, 12.0, 250.0] {
                for p in ring(count, radius, 0.0) {
                    assert!((p.position.length() - radius).abs() < radius * 1e-5);
                    assert!(p.position.y.abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn test_equal_angular_spacing() {
        let count = 8;
        let placements = ring(count, 12.0, 0.0);
        let spacing = TAU / count as f32;

        for i in 0..count {
            let a = placements[i].position;
            let b = placements[(i + 1) % count].position;
            // Angle between consecutive positions, via the dot product
            let cos_angle = a.dot(b) / (a.length() * b.length());
            assert!((cos_angle - spacing.cos()).abs() < EPS);
        }
    }

    #[test]
    fn test_yaw_faces_origin() {
        for (index, p) in ring(7, 9.0, 0.3).into_iter().enumerate() {
            let forward = rotate_y(ITEM_FORWARD, p.yaw);
            let to_origin = (-p.position).normalize();
            assert!(
                forward.dot(to_origin) > 1.0 - EPS,
                "item {} forward {:?} does not face origin",
                index,
                forward
            );
        }
    }

    #[test]
    fn test_n8_radius12_scenario() {
        let placements = ring(8, 12.0, 0.0);

        // Item 0 at (12, 0, 0), yaw 0
        assert!((placements[0].position - vec3(12.0, 0.0, 0.0)).length() < EPS);
        assert!(placements[0].yaw.abs() < EPS);

        // Item 4 is halfway around: (-12, 0, ~0), yaw -π
        assert!((placements[4].position.x - -12.0).abs() < EPS);
        assert!(placements[4].position.z.abs() < 1e-3);
        assert!((placements[4].yaw - -PI).abs() < EPS);
    }

    #[test]
    fn test_empty_ring() {
        assert!(ring(0, 12.0, 0.0).is_empty());
    }

    #[test]
    fn test_offset_rotates_whole_ring() {
        let offset = 0.5;
        let base = placement(2, 8, 12.0, 0.0);
        let shifted = placement(2, 8, 12.0, offset);

        assert!((shifted.yaw - (base.yaw - offset)).abs() < EPS);
        assert!((rotate_y(base.position, -offset) - shifted.position).length() < 1e-3);
    }
}
