//! The book carousel
//!
//! Owns the items (identity, texture set, base placement, current pose) and
//! the selection state machine, and advances both once per frame. Base
//! placements come from the layout module and only change with the book
//! count or radius; current poses are what the scene composer reads.

pub mod layout;
pub mod selection;
pub mod tween;

use crate::config::{BookSpec, TextureSet};
use layout::Placement;
use macroquad::math::Vec3;
use selection::{Phase, SelectionMachine, TransitionStyle};

/// A book's animated transform: position plus yaw about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl From<Placement> for Pose {
    fn from(p: Placement) -> Self {
        Self {
            position: p.position,
            yaw: p.yaw,
        }
    }
}

/// One displayed book. Identity is immutable; `pose` is rewritten by the
/// selection machine while an animation is in flight.
#[derive(Debug, Clone)]
pub struct Item {
    pub index: usize,
    pub textures: TextureSet,
    /// Path to the book mesh (shared across items in practice).
    pub mesh: String,
    pub base: Placement,
    pub pose: Pose,
}

pub struct Carousel {
    items: Vec<Item>,
    machine: SelectionMachine,
    style: TransitionStyle,
}

impl Carousel {
    /// Build the ring from the configured book list. An empty list degrades
    /// to an empty carousel, not an error.
    pub fn new(books: &[BookSpec], radius: f32, offset: f32, style: TransitionStyle) -> Self {
        let items = layout::ring(books.len(), radius, offset)
            .into_iter()
            .zip(books)
            .enumerate()
            .map(|(index, (base, spec))| Item {
                index,
                textures: spec.textures.clone(),
                mesh: spec.mesh.clone(),
                base,
                pose: Pose::from(base),
            })
            .collect();

        Self {
            items,
            machine: SelectionMachine::new(),
            style,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn selected(&self) -> Option<usize> {
        self.machine.selected()
    }

    pub fn camera_enabled(&self) -> bool {
        self.machine.camera_enabled()
    }

    /// Pointer click on book `k`. Ignored outside `Browsing`.
    pub fn select(&mut self, k: usize, now: f64) -> bool {
        self.machine.select(k, &self.items, &self.style, now)
    }

    /// Back control. Ignored outside `Selected`.
    pub fn back(&mut self, now: f64) -> bool {
        self.machine.back(&self.items, &self.style, now)
    }

    /// Advance the in-flight animation, if any.
    pub fn tick(&mut self, now: f64) {
        self.machine.tick(&mut self.items, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelfConfig;

    #[test]
    fn test_carousel_from_default_config() {
        let config = ShelfConfig::default();
        let carousel = Carousel::new(
            &config.books,
            config.radius,
            config.rotation_offset,
            TransitionStyle::default(),
        );

        assert_eq!(carousel.items().len(), config.books.len());
        assert_eq!(carousel.phase(), Phase::Browsing);
        assert!(carousel.camera_enabled());
        for (i, item) in carousel.items().iter().enumerate() {
            assert_eq!(item.index, i);
        }
    }

    #[test]
    fn test_tick_in_browsing_is_a_noop() {
        let config = ShelfConfig::default();
        let mut carousel = Carousel::new(
            &config.books,
            config.radius,
            0.0,
            TransitionStyle::default(),
        );

        let before: Vec<Pose> = carousel.items().iter().map(|i| i.pose).collect();
        carousel.tick(10.0);
        for (item, pose) in carousel.items().iter().zip(before) {
            assert_eq!(item.pose, pose);
        }
    }

    #[test]
    fn test_empty_book_list_degrades_to_empty_carousel() {
        let carousel = Carousel::new(&[], 12.0, 0.0, TransitionStyle::default());
        assert!(carousel.is_empty());
        assert_eq!(carousel.phase(), Phase::Browsing);
    }
}
