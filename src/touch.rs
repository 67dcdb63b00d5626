//! Turns raw pointer events into rotations and taps.
use crate::rotation::{RotationGesture, RotationState};
use kurbo::Point;
use std::time::Instant;

/// Pointer movement (in pixels) before a press turns into a drag.
pub const DRAG_THRESHOLD: f64 = 8.;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Cancel,
}

/// What a [`TouchEvent`] amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchAction {
    None,
    /// The chart was rotated and needs redrawing.
    Rotated,
    /// A drag ended with enough speed to keep spinning; drive it with `compute_scroll`.
    Fling,
    /// The pointer went down and up without dragging.
    Tap(Point),
}

/// Pointer handling for a pie or radar chart.
#[derive(Debug, Clone)]
pub struct TouchController {
    gesture: RotationGesture,
    rotation_enabled: bool,
    pressed_at: Option<Point>,
    dragging: bool,
}

impl TouchController {
    pub fn new(rotation_enabled: bool, gesture: RotationGesture) -> Self {
        Self {
            gesture,
            rotation_enabled,
            pressed_at: None,
            dragging: false,
        }
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        self.rotation_enabled = enabled;
        if !enabled {
            self.gesture.stop_deceleration();
        }
    }

    pub fn gesture(&self) -> &RotationGesture {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut RotationGesture {
        &mut self.gesture
    }

    pub fn handle(
        &mut self,
        event: TouchEvent,
        rotation: &mut RotationState,
        center: Point,
        now: Instant,
    ) -> TouchAction {
        match event {
            TouchEvent::Down(point) => {
                self.pressed_at = Some(point);
                self.dragging = false;
                if self.rotation_enabled {
                    self.gesture.begin(rotation, center, point, now);
                }
                TouchAction::None
            }
            TouchEvent::Move(point) => {
                let Some(start) = self.pressed_at else {
                    return TouchAction::None;
                };
                if !self.rotation_enabled {
                    return TouchAction::None;
                }
                if !self.dragging && start.distance(point) > DRAG_THRESHOLD {
                    self.dragging = true;
                }
                if self.dragging {
                    self.gesture.update(rotation, center, point, now);
                    TouchAction::Rotated
                } else {
                    TouchAction::None
                }
            }
            TouchEvent::Up(point) => {
                let Some(start) = self.pressed_at.take() else {
                    return TouchAction::None;
                };
                if self.dragging {
                    self.dragging = false;
                    if self.gesture.end(center, point, now) {
                        TouchAction::Fling
                    } else {
                        TouchAction::Rotated
                    }
                } else if start.distance(point) <= DRAG_THRESHOLD {
                    TouchAction::Tap(point)
                } else {
                    TouchAction::None
                }
            }
            TouchEvent::Cancel => {
                self.pressed_at = None;
                self.dragging = false;
                TouchAction::None
            }
        }
    }

    /// Advance a running fling. Returns `true` while the chart still needs redrawing.
    pub fn compute_scroll(&mut self, rotation: &mut RotationState, now: Instant) -> bool {
        self.gesture.compute_scroll(rotation, now)
    }
}
