//! Reveal-animation progress.
//!
//! Tweening itself lives with the host toolkit; the charts only read the current phases.
use serde::{Deserialize, Serialize};

/// Animation progress on the two chart axes, each in `[0, 1]`.
///
/// For pie charts `phase_x` scales how far along the circle slices have been laid out and
/// `phase_y` scales the sweep of each slice. Radar charts use `phase_x` for the spokes and
/// `phase_y` for the value radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    phase_x: f64,
    phase_y: f64,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            phase_x: 1.,
            phase_y: 1.,
        }
    }
}

impl Animator {
    pub fn new(phase_x: f64, phase_y: f64) -> Self {
        let mut animator = Self::default();
        animator.set_phase_x(phase_x);
        animator.set_phase_y(phase_y);
        animator
    }

    pub fn phase_x(&self) -> f64 {
        self.phase_x
    }

    pub fn phase_y(&self) -> f64 {
        self.phase_y
    }

    pub fn set_phase_x(&mut self, phase: f64) {
        self.phase_x = clamp_phase(phase);
    }

    pub fn set_phase_y(&mut self, phase: f64) {
        self.phase_y = clamp_phase(phase);
    }

    pub fn is_finished(&self) -> bool {
        self.phase_x >= 1. && self.phase_y >= 1.
    }
}

fn clamp_phase(phase: f64) -> f64 {
    if phase.is_nan() {
        1.
    } else {
        phase.clamp(0., 1.)
    }
}
