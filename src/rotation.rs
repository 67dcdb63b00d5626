//! Chart rotation and the drag-to-rotate gesture.
use crate::polar::{self, normalize_angle};
use kurbo::Point;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The angular origin of every slice and highlight computation, in the chart frame.
///
/// `raw` accumulates across gestures and may leave `[0, 360)`; `normalized` never does.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    raw: f64,
    normalized: f64,
}

impl RotationState {
    pub fn new(angle: f64) -> Self {
        let mut state = Self::default();
        state.set(angle);
        state
    }

    pub fn set(&mut self, angle: f64) {
        self.raw = angle;
        self.normalized = normalize_angle(angle);
    }

    /// Rotate by `delta` degrees relative to the current raw angle.
    pub fn rotate_by(&mut self, delta: f64) {
        self.set(self.raw + delta);
    }

    pub fn raw(&self) -> f64 {
        self.raw
    }

    pub fn normalized(&self) -> f64 {
        self.normalized
    }
}

#[derive(Debug, Clone, Copy)]
struct AngularVelocitySample {
    time: Instant,
    angle: f64,
}

/// Velocity below this (degrees per second) stops a fling.
const MIN_FLING_VELOCITY: f64 = 0.001;
/// Samples older than this are dropped, keeping at least two.
const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Tracks a drag-to-rotate gesture around `center`, including the fling that follows it.
#[derive(Debug, Clone)]
pub struct RotationGesture {
    start_angle: f64,
    samples: VecDeque<AngularVelocitySample>,
    deceleration_velocity: f64,
    deceleration_last_time: Option<Instant>,
    deceleration_enabled: bool,
    friction: f64,
}

impl Default for RotationGesture {
    fn default() -> Self {
        Self {
            start_angle: 0.,
            samples: VecDeque::new(),
            deceleration_velocity: 0.,
            deceleration_last_time: None,
            deceleration_enabled: true,
            friction: 0.9,
        }
    }
}

impl RotationGesture {
    pub fn new(deceleration_enabled: bool, friction: f64) -> Self {
        Self {
            deceleration_enabled,
            friction: clamp_friction(friction),
            ..Self::default()
        }
    }

    /// Friction is kept in `[0, 0.999]`; `1` would spin forever.
    pub fn set_friction(&mut self, friction: f64) {
        self.friction = clamp_friction(friction);
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn set_deceleration_enabled(&mut self, enabled: bool) {
        self.deceleration_enabled = enabled;
    }

    /// A finger went down at `point`.
    pub fn begin(&mut self, rotation: &RotationState, center: Point, point: Point, now: Instant) {
        self.stop_deceleration();
        self.samples.clear();
        if self.deceleration_enabled {
            self.sample_velocity(center, point, now);
        }
        self.start_angle = polar::angle_for_point(center, point) - rotation.raw();
    }

    /// The finger moved to `point`; the chart follows it.
    pub fn update(&mut self, rotation: &mut RotationState, center: Point, point: Point, now: Instant) {
        if self.deceleration_enabled {
            self.sample_velocity(center, point, now);
        }
        rotation.set(polar::angle_for_point(center, point) - self.start_angle);
    }

    /// The finger was lifted. Returns `true` when a fling was started.
    pub fn end(&mut self, center: Point, point: Point, now: Instant) -> bool {
        if self.deceleration_enabled {
            self.sample_velocity(center, point, now);
        }
        self.deceleration_velocity = self.calculate_velocity();
        if self.deceleration_velocity != 0. {
            self.deceleration_last_time = Some(now);
            log::trace!("fling at {:.2} deg/s", self.deceleration_velocity);
            true
        } else {
            false
        }
    }

    pub fn is_decelerating(&self) -> bool {
        self.deceleration_velocity != 0.
    }

    pub fn deceleration_velocity(&self) -> f64 {
        self.deceleration_velocity
    }

    pub fn stop_deceleration(&mut self) {
        self.deceleration_velocity = 0.;
        self.deceleration_last_time = None;
    }

    /// Advance a running fling to `now`. Returns `true` while the chart still needs redrawing.
    pub fn compute_scroll(&mut self, rotation: &mut RotationState, now: Instant) -> bool {
        if self.deceleration_velocity == 0. {
            return false;
        }

        self.deceleration_velocity *= self.friction;

        let last = self.deceleration_last_time.unwrap_or(now);
        let interval = now.saturating_duration_since(last).as_secs_f64();
        rotation.set(rotation.normalized() + self.deceleration_velocity * interval);
        self.deceleration_last_time = Some(now);

        if self.deceleration_velocity.abs() >= MIN_FLING_VELOCITY {
            true
        } else {
            self.stop_deceleration();
            false
        }
    }

    fn sample_velocity(&mut self, center: Point, point: Point, now: Instant) {
        self.samples.push_back(AngularVelocitySample {
            time: now,
            angle: polar::angle_for_point(center, point),
        });

        while self.samples.len() > 2 {
            match self.samples.front() {
                Some(first) if now.saturating_duration_since(first.time) > SAMPLE_WINDOW => {
                    self.samples.pop_front();
                }
                _ => break,
            }
        }
    }

    fn calculate_velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.;
        };
        let (mut first_angle, mut last_angle) = (first.angle, last.angle);

        // closest earlier sample with a different angle tells the direction
        let before_last = self
            .samples
            .iter()
            .rev()
            .find(|s| s.angle != last.angle)
            .unwrap_or(first);

        let mut time_delta = last.time.saturating_duration_since(first.time).as_secs_f64();
        if time_delta == 0. {
            time_delta = 0.1;
        }

        // consecutive samples far apart have wrapped past 0/360
        let mut clockwise = last_angle >= before_last.angle;
        if (last_angle - before_last.angle).abs() > 270. {
            clockwise = !clockwise;
        }

        if last_angle - first_angle > 180. {
            first_angle += 360.;
        } else if first_angle - last_angle > 180. {
            last_angle += 360.;
        }

        let velocity = ((last_angle - first_angle) / time_delta).abs();
        if clockwise {
            velocity
        } else {
            -velocity
        }
    }
}

fn clamp_friction(friction: f64) -> f64 {
    if friction.is_nan() {
        0.
    } else {
        friction.clamp(0., 0.999)
    }
}
