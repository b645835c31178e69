//! Scene composition and rendering
//!
//! `compose` is the pure half: it reads the carousel's current poses and
//! selection phase and produces the frame's render list, the camera-enable
//! flag and decor visibility. `draw_frame` is the draw pass over that list.
//! An item whose mesh has not resolved yet is drawn as a placeholder slab;
//! unresolved decor is simply skipped.

use crate::assets::AssetStore;
use crate::camera::OrbitCamera;
use crate::carousel::selection::Phase;
use crate::carousel::{Carousel, Item, Pose};
use crate::config::DisplayPolicy;
use crate::decor::Decor;
use macroquad::color::{Color, WHITE};
use macroquad::math::{vec3, Mat4, Vec3};
use macroquad::models::{draw_cube, draw_mesh};
use macroquad::prelude::get_internal_gl;
use macroquad::window::clear_background;

/// Brightness applied to non-selected books under `DimOthers`
const DIM_BRIGHTNESS: f32 = 0.45;
/// Placeholder slab dimensions while a book mesh is loading
const PLACEHOLDER_SIZE: Vec3 = vec3(1.8, 2.6, 0.5);
/// Parchment backdrop colour
const BACKDROP: Color = Color::new(0.95, 0.91, 0.82, 1.0);

/// One entry in the frame's render list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub index: usize,
    pub pose: Pose,
    pub visible: bool,
    /// 1.0 = full tint; lower values dim the item.
    pub brightness: f32,
}

/// Everything the draw pass needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub items: Vec<RenderItem>,
    pub camera_enabled: bool,
    pub show_decor: bool,
}

/// Build the render list for the current tick.
pub fn compose(carousel: &Carousel, policy: DisplayPolicy) -> FrameSpec {
    let phase = carousel.phase();
    let selected = carousel.selected();

    let items = carousel
        .items()
        .iter()
        .map(|item| {
            let (visible, brightness) = match (selected, policy) {
                // Browsing and Transitioning show everything at full tint
                (None, _) => (true, 1.0),
                (Some(k), _) if k == item.index => (true, 1.0),
                (Some(_), DisplayPolicy::DimOthers) => (true, DIM_BRIGHTNESS),
                (Some(_), DisplayPolicy::HideOthers) => (false, 1.0),
            };
            RenderItem {
                index: item.index,
                pose: item.pose,
                visible,
                brightness,
            }
        })
        .collect();

    FrameSpec {
        items,
        camera_enabled: phase == Phase::Browsing,
        show_decor: matches!(phase, Phase::Selected(_)),
    }
}

fn pose_matrix(pose: Pose, scale: f32) -> Mat4 {
    Mat4::from_translation(pose.position)
        * Mat4::from_rotation_y(pose.yaw)
        * Mat4::from_scale(Vec3::splat(scale))
}

fn with_model_matrix(matrix: Mat4, draw: impl FnOnce()) {
    unsafe {
        get_internal_gl().quad_gl.push_model_matrix(matrix);
    }
    draw();
    unsafe {
        get_internal_gl().quad_gl.pop_model_matrix();
    }
}

/// Draw one composed frame. `items` must be the same slice `compose` read.
pub fn draw_frame(
    frame: &FrameSpec,
    items: &[Item],
    decor: &Decor,
    assets: &AssetStore,
    camera: &OrbitCamera,
) {
    clear_background(BACKDROP);
    macroquad::camera::set_camera(&camera.to_camera3d());

    for entry in frame.items.iter().filter(|e| e.visible) {
        let item = &items[entry.index];
        let b = entry.brightness;
        let tint = Color::new(b, b, b, 1.0);
        let texture = assets.texture(&item.textures.base_color);

        match assets.mesh(&item.mesh) {
            Some(data) => {
                let mesh = data.to_mesh(texture.cloned(), tint);
                with_model_matrix(pose_matrix(entry.pose, 1.0), || draw_mesh(&mesh));
            }
            None => {
                // Mesh still loading: a stand-in slab at the item's pose,
                // textured with whatever cover has already arrived
                with_model_matrix(pose_matrix(entry.pose, 1.0), || {
                    draw_cube(Vec3::ZERO, PLACEHOLDER_SIZE, texture, tint);
                });
            }
        }
    }

    if frame.show_decor {
        if let Some(path) = &decor.mesh {
            // Nothing to draw until the model resolves
            if let Some(data) = assets.mesh(path) {
                let mesh = data.to_mesh(None, WHITE);
                with_model_matrix(pose_matrix(decor.pose, decor.scale), || draw_mesh(&mesh));
            }
        }
    }

    macroquad::camera::set_default_camera();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::selection::TransitionStyle;
    use crate::config::ShelfConfig;

    fn make_carousel() -> Carousel {
        let config = ShelfConfig::default();
        Carousel::new(
            &config.books,
            config.radius,
            config.rotation_offset,
            TransitionStyle::default(),
        )
    }

    fn settle(carousel: &mut Carousel, from: f64) -> f64 {
        let mut now = from;
        for _ in 0..40 {
            now += 0.1;
            carousel.tick(now);
        }
        now
    }

    #[test]
    fn test_browsing_shows_everything() {
        let carousel = make_carousel();
        let frame = compose(&carousel, DisplayPolicy::DimOthers);

        assert!(frame.camera_enabled);
        assert!(!frame.show_decor);
        assert_eq!(frame.items.len(), 8);
        assert!(frame.items.iter().all(|i| i.visible && i.brightness == 1.0));
    }

    #[test]
    fn test_transitioning_locks_camera_but_hides_nothing() {
        let mut carousel = make_carousel();
        carousel.select(2, 0.0);

        let frame = compose(&carousel, DisplayPolicy::HideOthers);
        assert!(!frame.camera_enabled);
        assert!(!frame.show_decor);
        assert!(frame.items.iter().all(|i| i.visible));
    }

    #[test]
    fn test_selected_dims_others() {
        let mut carousel = make_carousel();
        carousel.select(2, 0.0);
        settle(&mut carousel, 0.0);

        let frame = compose(&carousel, DisplayPolicy::DimOthers);
        assert!(frame.show_decor);
        assert!(!frame.camera_enabled);
        for entry in &frame.items {
            assert!(entry.visible);
            if entry.index == 2 {
                assert_eq!(entry.brightness, 1.0);
            } else {
                assert!(entry.brightness < 1.0);
            }
        }
    }

    #[test]
    fn test_selected_hides_others() {
        let mut carousel = make_carousel();
        carousel.select(5, 0.0);
        settle(&mut carousel, 0.0);

        let frame = compose(&carousel, DisplayPolicy::HideOthers);
        for entry in &frame.items {
            assert_eq!(entry.visible, entry.index == 5);
        }
    }

    #[test]
    fn test_back_restores_browsing_frame() {
        let mut carousel = make_carousel();
        carousel.select(1, 0.0);
        let now = settle(&mut carousel, 0.0);
        carousel.back(now);
        settle(&mut carousel, now);

        let frame = compose(&carousel, DisplayPolicy::DimOthers);
        assert!(frame.camera_enabled);
        assert!(!frame.show_decor);
        assert!(frame.items.iter().all(|i| i.visible && i.brightness == 1.0));
    }
}
