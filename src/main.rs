//! BOOKWHEEL: a 3D book carousel portfolio viewer
//!
//! A ring of books orbits in front of the camera. Click a book to bring it
//! front and centre (locking the camera and revealing the decor model);
//! Escape or right click returns to the shelf. Everything about the shelf -
//! books, covers, transition tuning, display policy - comes from
//! `assets/shelf.ron`.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod assets;
mod camera;
mod carousel;
mod config;
mod decor;
mod input;
mod scene;

use app::AppState;
use macroquad::prelude::*;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("BOOKWHEEL v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let shelf = config::load_shelf_or_default("assets/shelf.ron");
    println!("=== BOOKWHEEL v{} ===", VERSION);
    println!("{} books on the shelf", shelf.books.len());

    let mut app = AppState::new(shelf);

    loop {
        app.update(get_time());
        app.draw();
        next_frame().await;
    }
}
