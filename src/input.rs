//! Pointer input
//!
//! Maps raw mouse/keyboard events to the two interactions the carousel
//! understands: "clicked book k" and "back". Book clicks are resolved by
//! casting a ray from the camera through the cursor and intersecting item
//! bounding spheres at their current positions; the nearest hit wins. A
//! press that moves further than the slop threshold is a camera drag, not a
//! click.

use crate::camera::OrbitCamera;
use crate::carousel::Item;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position, KeyCode,
    MouseButton,
};
use macroquad::math::{vec2, Vec2, Vec3};
use macroquad::window::{screen_height, screen_width};

/// Default picking sphere radius around a book's position, used until its
/// mesh has resolved and can report a real bounding radius.
pub const DEFAULT_PICK_RADIUS: f32 = 2.5;

/// How far (pixels) a press may travel and still count as a click
const CLICK_SLOP: f32 = 5.0;

/// The only two inputs the selection machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Select(usize),
    Back,
}

/// Separates clicks from orbit drags on the left button.
#[derive(Default)]
pub struct ClickTracker {
    press: Option<Vec2>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of press/release state. Returns the cursor position
    /// when a click (press and release without real movement) completed.
    pub fn track(&mut self, pressed: bool, released: bool, cursor: Vec2) -> Option<Vec2> {
        if pressed {
            self.press = Some(cursor);
        }
        if released {
            if let Some(origin) = self.press.take() {
                if (cursor - origin).length() <= CLICK_SLOP {
                    return Some(cursor);
                }
            }
        }
        None
    }
}

/// Cast a ray from the camera through a screen point.
pub fn pointer_ray(camera: &OrbitCamera, screen: Vec2, screen_size: Vec2) -> (Vec3, Vec3) {
    let origin = camera.position();
    let forward = camera.forward();
    let right = forward.cross(Vec3::Y).normalize();
    let up = right.cross(forward);

    // Screen point to normalized device coordinates (+Y up)
    let ndc_x = 2.0 * screen.x / screen_size.x - 1.0;
    let ndc_y = 1.0 - 2.0 * screen.y / screen_size.y;

    let half_h = (camera.fovy * 0.5).tan();
    let aspect = screen_size.x / screen_size.y;
    let dir = (forward + right * (ndc_x * half_h * aspect) + up * (ndc_y * half_h)).normalize();

    (origin, dir)
}

/// Ray/sphere intersection; returns the nearest positive hit distance.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t = -b - sqrt_disc;
    if t >= 0.0 {
        return Some(t);
    }
    let t = -b + sqrt_disc;
    (t >= 0.0).then_some(t)
}

/// The item (if any) whose bounding sphere the ray hits first.
pub fn pick_item(origin: Vec3, dir: Vec3, items: &[Item], pick_radius: f32) -> Option<usize> {
    items
        .iter()
        .filter_map(|item| {
            ray_sphere(origin, dir, item.pose.position, pick_radius).map(|t| (item.index, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Poll this frame's input. Back (Escape or right click) takes precedence
/// over book clicks.
pub fn poll_pointer(
    tracker: &mut ClickTracker,
    camera: &OrbitCamera,
    items: &[Item],
    pick_radius: f32,
) -> Option<PointerEvent> {
    if is_key_pressed(KeyCode::Escape) || is_mouse_button_pressed(MouseButton::Right) {
        return Some(PointerEvent::Back);
    }

    let (mx, my) = mouse_position();
    let clicked = tracker.track(
        is_mouse_button_pressed(MouseButton::Left),
        is_mouse_button_released(MouseButton::Left),
        vec2(mx, my),
    )?;

    let screen_size = vec2(screen_width(), screen_height());
    let (origin, dir) = pointer_ray(camera, clicked, screen_size);
    pick_item(origin, dir, items, pick_radius).map(PointerEvent::Select)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::layout::{self, Placement};
    use crate::carousel::Pose;
    use crate::config::TextureSet;
    use macroquad::math::vec3;

    fn item_at(index: usize, position: Vec3) -> Item {
        let base = Placement {
            position,
            yaw: 0.0,
        };
        Item {
            index,
            textures: TextureSet::base_only("cover.png"),
            mesh: "book.obj".to_string(),
            base,
            pose: Pose::from(base),
        }
    }

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let cam = OrbitCamera::new(Vec3::ZERO, 25.0);
        let (origin, dir) = pointer_ray(&cam, vec2(640.0, 360.0), vec2(1280.0, 720.0));
        assert!((origin - vec3(0.0, 0.0, 25.0)).length() < 1e-3);
        assert!((dir - vec3(0.0, 0.0, -1.0)).length() < 1e-3);
    }

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let origin = vec3(0.0, 0.0, 25.0);
        let dir = vec3(0.0, 0.0, -1.0);

        let t = ray_sphere(origin, dir, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 23.0).abs() < 1e-4);

        // Sphere behind the camera
        assert!(ray_sphere(origin, dir, vec3(0.0, 0.0, 40.0), 2.0).is_none());
        // Off to the side
        assert!(ray_sphere(origin, dir, vec3(10.0, 0.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn test_pick_nearest_item() {
        let items = vec![
            item_at(0, vec3(0.0, 0.0, -12.0)),
            item_at(1, vec3(0.0, 0.0, 12.0)),
        ];
        let origin = vec3(0.0, 0.0, 25.0);
        let dir = vec3(0.0, 0.0, -1.0);

        // The ray passes through both; the closer one (index 1) wins
        assert_eq!(pick_item(origin, dir, &items, 2.0), Some(1));
    }

    #[test]
    fn test_pick_misses_everything() {
        let items: Vec<Item> = layout::ring(8, 12.0, 0.0)
            .into_iter()
            .enumerate()
            .map(|(i, p)| item_at(i, p.position))
            .collect();

        // Straight up, away from the ring plane
        let origin = vec3(0.0, 0.0, 25.0);
        let dir = vec3(0.0, 1.0, 0.0);
        assert_eq!(pick_item(origin, dir, &items, 2.0), None);
    }

    #[test]
    fn test_click_tracker_slop() {
        let mut tracker = ClickTracker::new();

        // Clean click
        assert_eq!(tracker.track(true, false, vec2(100.0, 100.0)), None);
        assert_eq!(
            tracker.track(false, true, vec2(102.0, 101.0)),
            Some(vec2(102.0, 101.0))
        );

        // Drag: moved past the slop before release
        assert_eq!(tracker.track(true, false, vec2(100.0, 100.0)), None);
        assert_eq!(tracker.track(false, true, vec2(160.0, 100.0)), None);

        // Release without a press
        assert_eq!(tracker.track(false, true, vec2(0.0, 0.0)), None);
    }
}
