//! Application state
//!
//! One struct owning everything the frame loop touches: the shelf config,
//! the carousel and its selection machine, the orbit camera, the asset
//! store and the decor model. `update` runs input -> animation -> camera
//! once per frame; `draw` composes and renders the scene plus the 2D
//! overlay.

use crate::assets::AssetStore;
use crate::camera::OrbitCamera;
use crate::carousel::selection::Phase;
use crate::carousel::Carousel;
use crate::config::ShelfConfig;
use crate::decor::Decor;
use crate::input::{self, ClickTracker, PointerEvent, DEFAULT_PICK_RADIUS};
use crate::scene;
use macroquad::color::Color;
use macroquad::math::vec3;
use macroquad::text::{draw_text, measure_text};
use macroquad::window::screen_width;

/// Default camera orbit distance, far enough back to frame the whole ring.
const CAMERA_DISTANCE: f32 = 25.0;

const HEADING_COLOR: Color = Color::new(0.24, 0.16, 0.13, 1.0);

pub struct AppState {
    pub config: ShelfConfig,
    pub carousel: Carousel,
    pub camera: OrbitCamera,
    pub assets: AssetStore,
    pub decor: Decor,
    clicks: ClickTracker,
}

impl AppState {
    /// Build the scene from a shelf config and kick off every asset load.
    pub fn new(config: ShelfConfig) -> Self {
        let carousel = Carousel::new(
            &config.books,
            config.radius,
            config.rotation_offset,
            config.transition.style(),
        );

        let mut assets = AssetStore::new();
        for book in &config.books {
            assets.request_mesh(&book.mesh);
            for path in book.textures.paths() {
                assets.request_texture(path);
            }
        }
        let decor = Decor::from_spec(config.decor.as_ref());
        if let Some(path) = &decor.mesh {
            assets.request_mesh(path);
        }

        Self {
            config,
            carousel,
            camera: OrbitCamera::new(vec3(0.0, 0.0, 0.0), CAMERA_DISTANCE),
            assets,
            decor,
            clicks: ClickTracker::new(),
        }
    }

    /// Picking radius around each book: the real bounding sphere once the
    /// book mesh has resolved, a rough slab radius before that.
    pub fn pick_radius(&self) -> f32 {
        self.carousel
            .items()
            .first()
            .and_then(|item| self.assets.mesh(&item.mesh))
            .map(|mesh| mesh.bounding_radius())
            .unwrap_or(DEFAULT_PICK_RADIUS)
    }

    /// One frame of simulation: poll loads, route pointer events, advance
    /// the animation, then let the camera see the (possibly new) lock state.
    pub fn update(&mut self, now: f64) {
        self.assets.poll();

        let pick_radius = self.pick_radius();
        match input::poll_pointer(
            &mut self.clicks,
            &self.camera,
            self.carousel.items(),
            pick_radius,
        ) {
            Some(PointerEvent::Select(k)) => {
                if self.carousel.select(k, now) {
                    println!("Selected book {}", k);
                }
            }
            Some(PointerEvent::Back) => {
                if self.carousel.back(now) {
                    println!("Returning to shelf");
                }
            }
            None => {}
        }

        self.carousel.tick(now);
        self.camera.enabled = self.carousel.camera_enabled();
        self.camera.update();
    }

    pub fn draw(&self) {
        let frame = scene::compose(&self.carousel, self.config.display);
        scene::draw_frame(
            &frame,
            self.carousel.items(),
            &self.decor,
            &self.assets,
            &self.camera,
        );
        self.draw_overlay();
    }

    /// 2D overlay: heading, loading progress, and a hint while a book is up.
    fn draw_overlay(&self) {
        let heading = &self.config.title;
        let size = measure_text(heading, None, 48, 1.0);
        draw_text(
            heading,
            (screen_width() - size.width) * 0.5,
            64.0,
            48.0,
            HEADING_COLOR,
        );

        for (i, line) in self.status_lines().iter().enumerate() {
            draw_text(line, 16.0, 92.0 + i as f32 * 26.0, 22.0, HEADING_COLOR);
        }
    }

    /// Status lines under the heading, stacked so they never overdraw.
    fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if self.carousel.is_empty() {
            lines.push("The shelf is empty".to_string());
        }

        if !self.assets.is_idle() {
            let (settled, total) = self.assets.progress();
            lines.push(format!("Loading assets {}/{}", settled, total));
        }

        if let Phase::Selected(k) = self.carousel.phase() {
            let label = self
                .config
                .books
                .get(k)
                .map(|book| book.title.as_str())
                .unwrap_or("");
            lines.push(format!("{}  -  Esc to go back", label));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::Vec3;

    #[test]
    fn test_app_state_wiring() {
        let config = ShelfConfig::default();
        let app = AppState::new(config);

        assert_eq!(app.carousel.items().len(), 8);
        assert!(app.camera.enabled);
        // 8 books share one mesh, plus the decor mesh; 5 distinct covers
        let (_, total) = app.assets.progress();
        assert_eq!(total, 7);
        // Nothing resolved yet, so picking falls back to the default radius
        assert_eq!(app.pick_radius(), DEFAULT_PICK_RADIUS);
    }

    #[test]
    fn test_status_lines_stack_while_loading() {
        let mut app = AppState::new(ShelfConfig::default());
        app.carousel.select(2, 0.0);
        let mut now = 0.0;
        for _ in 0..40 {
            now += 0.1;
            app.carousel.tick(now);
        }
        assert_eq!(app.carousel.selected(), Some(2));

        // Loads were never polled, so the loading line is still up alongside
        // the selection hint; each gets its own line
        let lines = app.status_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Loading assets"));
        assert!(lines[1].contains("Esc to go back"));
    }

    #[test]
    fn test_empty_shelf_reports_itself() {
        let mut config = ShelfConfig::default();
        config.books.clear();
        config.decor = None;
        let app = AppState::new(config);

        assert!(app.carousel.is_empty());
        assert_eq!(app.status_lines(), vec!["The shelf is empty".to_string()]);
    }

    #[test]
    fn test_camera_starts_behind_ring() {
        let app = AppState::new(ShelfConfig::default());
        assert!((app.camera.position() - Vec3::new(0.0, 0.0, 25.0)).length() < 1e-3);
    }
}
