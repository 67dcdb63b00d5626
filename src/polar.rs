//! Polar coordinate helpers shared by the pie and radar charts.
//!
//! Two angle frames are in play. [`point_at_angle`] works in screen space where 0° points EAST
//! and angles grow clockwise (y grows downwards). The chart itself measures angles from NORTH,
//! also clockwise, which is what [`angle_for_point`] returns. [`chart_to_screen_angle`] converts
//! between the two.
use kurbo::Point;

pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Values with a magnitude at or below this are treated as zero.
pub const NUMBER_EPSILON: f64 = f64::EPSILON;

/// Offset between the screen frame (EAST is zero) and the chart frame (NORTH is zero).
pub const NORTH_OFFSET: f64 = 90.0;

#[inline]
pub fn to_radians(deg: f64) -> f64 {
    deg * DEG2RAD
}

#[inline]
pub fn to_degrees(rad: f64) -> f64 {
    rad * RAD2DEG
}

/// Wrap an angle into `[0, 360)`.
///
/// Works for arbitrarily large negative input without looping.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = ((angle % 360.) + 360.) % 360.;
    // `x % 360 + 360` can round up to exactly 360 for tiny negative x
    if wrapped >= 360. {
        0.
    } else {
        wrapped
    }
}

/// The point `distance` away from `center` in direction `angle` (screen frame, degrees).
pub fn point_at_angle(center: Point, distance: f64, angle: f64) -> Point {
    let rad = to_radians(angle);
    Point::new(
        center.x + distance * rad.cos(),
        center.y + distance * rad.sin(),
    )
}

/// Screen-frame angle of `point` around `center`, the inverse of [`point_at_angle`].
///
/// Returns `0` when the point coincides with the center.
pub fn screen_angle_for_point(center: Point, point: Point) -> f64 {
    let tx = point.x - center.x;
    let ty = point.y - center.y;
    let length = tx.hypot(ty);
    if length == 0. {
        return 0.;
    }

    // measured clockwise from SOUTH
    let mut angle = to_degrees((ty / length).clamp(-1., 1.).acos());
    if point.x > center.x {
        angle = 360. - angle;
    }

    // SOUTH to EAST
    angle += 90.;
    if angle > 360. {
        angle -= 360.;
    }
    angle
}

/// Chart-frame angle (NORTH is zero, clockwise) of `point` around `center`, in `[0, 360)`.
pub fn angle_for_point(center: Point, point: Point) -> f64 {
    normalize_angle(screen_angle_for_point(center, point) + NORTH_OFFSET)
}

/// Convert a chart-frame angle into the screen frame used for drawing.
#[inline]
pub fn chart_to_screen_angle(angle: f64) -> f64 {
    angle - NORTH_OFFSET
}

pub fn distance_to_center(center: Point, point: Point) -> f64 {
    center.distance(point)
}
