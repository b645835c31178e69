//! Selection state machine
//!
//! Tracks which book (if any) is selected and drives the pose animation
//! between the browsing ring and the presentation pose. `Transitioning` is
//! itself the transition lock: select/back events arriving while an
//! animation is in flight are ignored, and the lock releases on animation
//! completion rather than a timer.

use super::tween::{Easing, PoseTween};
use super::{Item, Pose};
use macroquad::math::vec3;
use std::f32::consts::FRAC_PI_2;

/// Where an in-flight transition is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Animating toward `Selected(k)`.
    Select(usize),
    /// Animating back toward `Browsing`.
    Return,
}

/// The three selection states. Free orbiting is only available in `Browsing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Browsing,
    Transitioning { goal: Goal },
    Selected(usize),
}

/// Tuning for the select/back animation. All of this comes from the shelf
/// config.
#[derive(Debug, Clone, Copy)]
pub struct TransitionStyle {
    /// Pose the selected book animates to: front and centre, cover toward
    /// the default camera on +Z.
    pub presentation: Pose,
    /// Radial scale applied to non-selected books while one is selected.
    pub dismiss_scale: f32,
    /// Vertical offset added to non-selected books while one is selected.
    pub dismiss_lift: f32,
    /// Animation length in seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for TransitionStyle {
    fn default() -> Self {
        Self {
            presentation: Pose {
                position: vec3(0.0, 0.0, 5.0),
                yaw: FRAC_PI_2,
            },
            dismiss_scale: 1.6,
            dismiss_lift: 6.0,
            duration: 1.5,
            easing: Easing::CubicOut,
        }
    }
}

impl TransitionStyle {
    /// Target pose for a non-selected book: its base spot pushed outward and
    /// upward so the presented book stands alone.
    pub fn dismissed_pose(&self, item: &Item) -> Pose {
        let base = item.base.position;
        Pose {
            position: vec3(
                base.x * self.dismiss_scale,
                base.y + self.dismiss_lift,
                base.z * self.dismiss_scale,
            ),
            yaw: item.base.yaw,
        }
    }
}

/// The selection state machine. Owns the per-item tween records while a
/// transition is in flight; `tick` writes sampled poses into the items.
pub struct SelectionMachine {
    phase: Phase,
    tweens: Vec<PoseTween>,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Browsing,
            tweens: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the selected book, if fully selected.
    pub fn selected(&self) -> Option<usize> {
        match self.phase {
            Phase::Selected(k) => Some(k),
            _ => None,
        }
    }

    /// Orbit controls are only live while browsing.
    pub fn camera_enabled(&self) -> bool {
        matches!(self.phase, Phase::Browsing)
    }

    /// Begin selecting book `k`. Only valid from `Browsing` with `k` in
    /// range; anything else (including a click mid-transition) is ignored.
    /// Returns whether the transition started.
    pub fn select(&mut self, k: usize, items: &[Item], style: &TransitionStyle, now: f64) -> bool {
        if self.phase != Phase::Browsing || k >= items.len() {
            return false;
        }

        self.tweens = items
            .iter()
            .map(|item| {
                let target = if item.index == k {
                    style.presentation
                } else {
                    style.dismissed_pose(item)
                };
                PoseTween::new(item.pose, target, now, style.duration, style.easing)
            })
            .collect();
        self.phase = Phase::Transitioning {
            goal: Goal::Select(k),
        };
        true
    }

    /// Begin returning to the browsing ring. Only valid from `Selected`.
    pub fn back(&mut self, items: &[Item], style: &TransitionStyle, now: f64) -> bool {
        if !matches!(self.phase, Phase::Selected(_)) {
            return false;
        }

        self.tweens = items
            .iter()
            .map(|item| {
                let target = Pose::from(item.base);
                PoseTween::new(item.pose, target, now, style.duration, style.easing)
            })
            .collect();
        self.phase = Phase::Transitioning { goal: Goal::Return };
        true
    }

    /// Advance the animation. Writes interpolated poses into `items`; when
    /// every tween has finished, snaps poses to their targets and settles
    /// into the goal state.
    pub fn tick(&mut self, items: &mut [Item], now: f64) {
        let goal = match self.phase {
            Phase::Transitioning { goal } => goal,
            _ => return,
        };

        for (item, tween) in items.iter_mut().zip(&self.tweens) {
            item.pose = tween.sample(now);
        }

        if self.tweens.iter().all(|t| t.is_complete(now)) {
            for (item, tween) in items.iter_mut().zip(&self.tweens) {
                item.pose = tween.to;
            }
            self.tweens.clear();
            self.phase = match goal {
                Goal::Select(k) => Phase::Selected(k),
                Goal::Return => Phase::Browsing,
            };
        }
    }
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new()
    }
}
