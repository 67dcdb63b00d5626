//! Outline construction for single pie slices.
//!
//! Angles in this module are in the screen frame (0° points EAST, clockwise), in degrees.
use crate::polar::{point_at_angle, to_radians, DEG2RAD, NUMBER_EPSILON};
use kurbo::{BezPath, PathEl, Point, Vec2};
use tinyvec::TinyVec;

/// Flattening tolerance used when arcs are converted to curves.
pub const ARC_TOLERANCE: f64 = 0.1;

/// One step of a slice outline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// A circular arc. Joined to the previous segment with a straight line.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    },
    /// A complete circle as its own closed contour.
    Circle {
        center: Point,
        radius: f64,
        clockwise: bool,
    },
    #[default]
    Close,
}

/// The closed outline of one slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceGeometry {
    segments: TinyVec<[PathSegment; 8]>,
}

impl SliceGeometry {
    fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep_angle: f64) {
        self.push(PathSegment::Arc {
            center,
            radius,
            start_angle,
            sweep_angle,
        });
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten into a kurbo path, ready to be filled with the non-zero rule.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for segment in self.segments.iter() {
            match *segment {
                PathSegment::MoveTo(p) => path.move_to(p),
                PathSegment::LineTo(p) => path.line_to(p),
                PathSegment::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => {
                    let start = point_at_angle(center, radius, start_angle);
                    if needs_move(&path) {
                        path.move_to(start);
                    } else {
                        path.line_to(start);
                    }
                    path.extend(circular_arc(center, radius, start_angle, sweep_angle));
                }
                PathSegment::Circle {
                    center,
                    radius,
                    clockwise,
                } => {
                    let sweep = if clockwise { 360. } else { -360. };
                    path.move_to(point_at_angle(center, radius, 0.));
                    path.extend(circular_arc(center, radius, 0., sweep));
                    path.close_path();
                }
                PathSegment::Close => {
                    if !needs_move(&path) {
                        path.close_path();
                    }
                }
            }
        }
        path
    }
}

fn needs_move(path: &BezPath) -> bool {
    matches!(path.elements().last(), None | Some(PathEl::ClosePath))
}

fn circular_arc(
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> impl Iterator<Item = PathEl> {
    kurbo::Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: to_radians(start_angle),
        sweep_angle: to_radians(sweep_angle),
        x_rotation: 0.,
    }
    .append_iter(ARC_TOLERANCE)
}

/// Everything needed to outline one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometryParams {
    pub center: Point,
    pub radius: f64,
    /// Radius of the center hole, `0` without one.
    pub inner_radius: f64,
    /// `true` when the slice ends in an inner arc (hole drawn, slices not under it).
    pub draw_inner_arc: bool,
    /// Gap between neighbouring slices, in pixels.
    pub slice_space: f64,
    /// Chart rotation, in the screen frame.
    pub rotation: f64,
    /// Where the slice starts relative to `rotation`, already scaled by the x phase.
    pub offset_angle: f64,
    /// Full sweep of the slice.
    pub slice_angle: f64,
    /// Reveal phase applied to offset and sweep.
    pub phase: f64,
    /// Radius of the caps on rounded slices; only honoured with an inner arc.
    pub rounded_radius: Option<f64>,
}

impl SliceGeometryParams {
    /// Spacing is corrected for only up to a half circle; wider slices keep their shape.
    pub fn accounts_for_spacing(&self) -> bool {
        self.slice_space > 0. && self.slice_angle <= 180.
    }

    fn outer_arc(&self, radius: f64) -> (f64, f64) {
        let space = spacing_angle(self.slice_space, radius);
        let start = self.rotation + (self.offset_angle + space / 2.) * self.phase;
        let sweep = ((self.slice_angle - space) * self.phase).max(0.);
        (start, sweep)
    }
}

/// Angle that a gap of `space` pixels takes up at `radius`.
pub fn spacing_angle(space: f64, radius: f64) -> f64 {
    if space == 0. || radius <= 0. {
        0.
    } else {
        space / (DEG2RAD * radius)
    }
}

/// Radius of the caps drawn at either end of a rounded slice: half the ring width.
pub fn rounded_slice_radius(radius: f64, hole_radius_percent: f64) -> f64 {
    (radius - radius * hole_radius_percent / 100.) / 2.
}

fn is_full_circle(sweep: f64) -> bool {
    sweep >= 360. && sweep % 360. <= NUMBER_EPSILON
}

/// The smallest radius at which two spaced slices stay a constant gap apart.
///
/// The spaced slice edges and the chord between the arc end points form an isosceles triangle
/// whose apex angle equals the slice angle. Its height is subtracted from the radius, and then
/// the bulge of the arc over the chord.
pub fn minimum_radius_for_spaced_slice(
    center: Point,
    radius: f64,
    angle: f64,
    arc_start: Point,
    start_angle: f64,
    sweep_angle: f64,
) -> f64 {
    let angle_middle = start_angle + sweep_angle / 2.;
    let arc_end = point_at_angle(center, radius, start_angle + sweep_angle);
    let arc_mid = point_at_angle(center, radius, angle_middle);

    let base = arc_start.distance(arc_end);
    let triangle_height = base / 2. * to_radians((180. - angle) / 2.).tan();

    let spaced_radius = radius - triangle_height;
    spaced_radius - arc_mid.distance(arc_start.midpoint(arc_end))
}

/// Outline of a slice in its resting position.
pub fn slice_geometry(p: &SliceGeometryParams) -> SliceGeometry {
    let mut geometry = SliceGeometry::default();
    let account_for_spacing = p.accounts_for_spacing();
    let (start_outer, sweep_outer) = p.outer_arc(p.radius);
    let full_circle = is_full_circle(sweep_outer);
    let rounded = p.rounded_radius.filter(|_| p.draw_inner_arc);
    let arc_start = point_at_angle(p.center, p.radius, start_outer);

    if full_circle {
        geometry.push(PathSegment::Circle {
            center: p.center,
            radius: p.radius,
            clockwise: true,
        });
    } else {
        geometry.arc(p.center, p.radius, start_outer, sweep_outer);
    }

    let mut inner_radius = p.inner_radius;
    if p.draw_inner_arc && (inner_radius > 0. || account_for_spacing) {
        if account_for_spacing {
            let min_spaced_radius = minimum_radius_for_spaced_slice(
                p.center,
                p.radius,
                p.slice_angle * p.phase,
                arc_start,
                start_outer,
                sweep_outer,
            );
            inner_radius = inner_radius.max(min_spaced_radius.abs());
        }

        let (start_inner, sweep_inner) = p.outer_arc(inner_radius);
        let end_inner = start_inner + sweep_inner;

        if full_circle {
            geometry.push(PathSegment::Circle {
                center: p.center,
                radius: inner_radius,
                clockwise: false,
            });
        } else {
            match rounded {
                Some(cap) => {
                    let cap_center = point_at_angle(p.center, p.radius - cap, end_inner);
                    geometry.arc(cap_center, cap, end_inner, 180.);
                }
                None => {
                    geometry.push(PathSegment::LineTo(point_at_angle(
                        p.center,
                        inner_radius,
                        end_inner,
                    )));
                }
            }
            geometry.arc(p.center, inner_radius, end_inner, -sweep_inner);
            if let Some(cap) = rounded {
                let cap_center = point_at_angle(p.center, p.radius - cap, start_outer);
                geometry.arc(cap_center, cap, start_outer + 180., -180.);
            }
        }
    } else if sweep_outer % 360. > NUMBER_EPSILON {
        geometry.push(PathSegment::LineTo(apex(p, arc_start, start_outer, sweep_outer)));
    }

    geometry.push(PathSegment::Close);
    geometry
}

/// Outline of a highlighted slice: the outer arc is pushed out by `shift` while the inner edge
/// keeps its resting geometry. Rounded caps are not drawn.
pub fn highlighted_slice_geometry(p: &SliceGeometryParams, shift: f64) -> SliceGeometry {
    let mut geometry = SliceGeometry::default();
    let account_for_spacing = p.accounts_for_spacing();
    let highlighted_radius = p.radius + shift;
    let (start_outer, sweep_outer) = p.outer_arc(p.radius);
    let (start_shifted, sweep_shifted) = p.outer_arc(highlighted_radius);
    let full_circle = is_full_circle(sweep_outer);
    let arc_start = point_at_angle(p.center, p.radius, start_outer);

    if full_circle {
        geometry.push(PathSegment::Circle {
            center: p.center,
            radius: highlighted_radius,
            clockwise: true,
        });
    } else {
        geometry.arc(p.center, highlighted_radius, start_shifted, sweep_shifted);
    }

    let mut inner_radius = p.inner_radius;
    if p.draw_inner_arc && (inner_radius > 0. || account_for_spacing) {
        if account_for_spacing {
            let min_spaced_radius = minimum_radius_for_spaced_slice(
                p.center,
                p.radius,
                p.slice_angle * p.phase,
                arc_start,
                start_outer,
                sweep_outer,
            );
            inner_radius = inner_radius.max(min_spaced_radius.abs());
        }

        let (start_inner, sweep_inner) = p.outer_arc(inner_radius);
        let end_inner = start_inner + sweep_inner;

        if full_circle {
            geometry.push(PathSegment::Circle {
                center: p.center,
                radius: inner_radius,
                clockwise: false,
            });
        } else {
            geometry.push(PathSegment::LineTo(point_at_angle(
                p.center,
                inner_radius,
                end_inner,
            )));
            geometry.arc(p.center, inner_radius, end_inner, -sweep_inner);
        }
    } else if sweep_outer % 360. > NUMBER_EPSILON {
        geometry.push(PathSegment::LineTo(apex(p, arc_start, start_outer, sweep_outer)));
    }

    geometry.push(PathSegment::Close);
    geometry
}

/// Where a slice without an inner arc meets the center: the center itself, or a point pulled
/// out along the slice's middle so spaced neighbours keep a constant gap.
fn apex(p: &SliceGeometryParams, arc_start: Point, start_outer: f64, sweep_outer: f64) -> Point {
    if !p.accounts_for_spacing() {
        return p.center;
    }
    let offset = minimum_radius_for_spaced_slice(
        p.center,
        p.radius,
        p.slice_angle * p.phase,
        arc_start,
        start_outer,
        sweep_outer,
    );
    point_at_angle(p.center, offset, start_outer + sweep_outer / 2.)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn params(slice_angle: f64) -> SliceGeometryParams {
        SliceGeometryParams {
            center: Point::new(100., 100.),
            radius: 100.,
            inner_radius: 0.,
            draw_inner_arc: false,
            slice_space: 0.,
            rotation: 0.,
            offset_angle: 0.,
            slice_angle,
            phase: 1.,
            rounded_radius: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn plain_slice_is_arc_then_center() {
        let geometry = slice_geometry(&SliceGeometryParams {
            offset_angle: 30.,
            rotation: -90.,
            ..params(60.)
        });
        assert_eq!(
            geometry.segments(),
            &[
                PathSegment::Arc {
                    center: Point::new(100., 100.),
                    radius: 100.,
                    start_angle: -60.,
                    sweep_angle: 60.,
                },
                PathSegment::LineTo(Point::new(100., 100.)),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn full_sweep_becomes_a_circle() {
        let geometry = slice_geometry(&params(360.));
        assert_eq!(
            geometry.segments(),
            &[
                PathSegment::Circle {
                    center: Point::new(100., 100.),
                    radius: 100.,
                    clockwise: true,
                },
                PathSegment::Close,
            ]
        );
        let path = geometry.to_path();
        let closes = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::ClosePath))
            .count();
        assert_eq!(closes, 1);
        assert!((path.area().abs() - std::f64::consts::PI * 100. * 100.).abs() < 50.);
    }

    #[test]
    fn full_ring_keeps_its_hole() {
        let geometry = slice_geometry(&SliceGeometryParams {
            inner_radius: 50.,
            draw_inner_arc: true,
            ..params(360.)
        });
        assert!(matches!(
            geometry.segments()[1],
            PathSegment::Circle {
                clockwise: false,
                ..
            }
        ));
        let ring = std::f64::consts::PI * (100. * 100. - 50. * 50.);
        assert!((geometry.to_path().area().abs() - ring).abs() < 50.);
    }

    #[test]
    fn hole_slice_runs_back_along_inner_arc() {
        let geometry = slice_geometry(&SliceGeometryParams {
            inner_radius: 50.,
            draw_inner_arc: true,
            ..params(90.)
        });
        let segments = geometry.segments();
        assert_eq!(segments.len(), 4);
        assert!(matches!(segments[1], PathSegment::LineTo(_)));
        match segments[2] {
            PathSegment::Arc {
                radius,
                start_angle,
                sweep_angle,
                ..
            } => {
                assert_eq!(radius, 50.);
                assert!(close(start_angle, 90.));
                assert!(close(sweep_angle, -90.));
            }
            other => panic!("expected inner arc, got {:?}", other),
        }
    }

    #[test]
    fn rounded_slice_caps_both_ends() {
        let cap = rounded_slice_radius(100., 50.);
        assert_eq!(cap, 25.);
        let geometry = slice_geometry(&SliceGeometryParams {
            inner_radius: 50.,
            draw_inner_arc: true,
            rounded_radius: Some(cap),
            ..params(90.)
        });
        let sweeps: Vec<(f64, f64)> = geometry
            .segments()
            .iter()
            .filter_map(|s| match s {
                PathSegment::Arc {
                    radius,
                    sweep_angle,
                    ..
                } => Some((*radius, *sweep_angle)),
                _ => None,
            })
            .collect();
        assert_eq!(sweeps, vec![(100., 90.), (25., 180.), (50., -90.), (25., -180.)]);
        assert_eq!(geometry.segments().last(), Some(&PathSegment::Close));
    }

    #[test]
    fn rounded_caps_need_an_inner_arc() {
        let geometry = slice_geometry(&SliceGeometryParams {
            rounded_radius: Some(25.),
            ..params(90.)
        });
        assert_eq!(geometry.segments().len(), 3);
    }

    #[test]
    fn spacing_shrinks_outer_sweep() {
        let p = SliceGeometryParams {
            slice_space: 10.,
            ..params(90.)
        };
        let space = spacing_angle(10., 100.);
        assert!(close(space, 10. / (DEG2RAD * 100.)));
        match slice_geometry(&p).segments()[0] {
            PathSegment::Arc {
                start_angle,
                sweep_angle,
                ..
            } => {
                assert!(close(start_angle, space / 2.));
                assert!(close(sweep_angle, 90. - space));
            }
            other => panic!("expected outer arc, got {:?}", other),
        }
    }

    #[test]
    fn spacing_never_inverts_the_arc() {
        let geometry = slice_geometry(&SliceGeometryParams {
            slice_space: 20.,
            ..params(5.)
        });
        match geometry.segments()[0] {
            PathSegment::Arc { sweep_angle, .. } => assert_eq!(sweep_angle, 0.),
            other => panic!("expected outer arc, got {:?}", other),
        }
    }

    #[test]
    fn unspaced_minimum_radius_is_the_center() {
        let center = Point::new(0., 0.);
        for angle in [10., 60., 90., 135., 180.] {
            let start = point_at_angle(center, 100., 0.);
            let r = minimum_radius_for_spaced_slice(center, 100., angle, start, 0., angle);
            assert!(r.abs() < 1e-9, "{} -> {}", angle, r);
        }
    }

    #[test]
    fn spaced_slice_apex_moves_out() {
        let p = SliceGeometryParams {
            slice_space: 10.,
            ..params(90.)
        };
        let geometry = slice_geometry(&p);
        let PathSegment::LineTo(apex) = geometry.segments()[1] else {
            panic!("expected apex line");
        };
        let distance = apex.distance(p.center);
        assert!(distance > 0. && distance < p.radius);
        // on the slice's bisector
        let angle = crate::polar::screen_angle_for_point(p.center, apex);
        assert!(close(angle, 45.));
    }

    #[test]
    fn spacing_ignored_past_half_circle() {
        let p = SliceGeometryParams {
            slice_space: 10.,
            ..params(200.)
        };
        assert!(!p.accounts_for_spacing());
        let geometry = slice_geometry(&p);
        assert_eq!(geometry.segments()[1], PathSegment::LineTo(p.center));
    }

    #[test]
    fn highlighted_slice_uses_shifted_radius() {
        let p = SliceGeometryParams {
            inner_radius: 40.,
            draw_inner_arc: true,
            rounded_radius: Some(30.),
            ..params(120.)
        };
        let geometry = highlighted_slice_geometry(&p, 12.);
        match geometry.segments()[0] {
            PathSegment::Arc { radius, .. } => assert_eq!(radius, 112.),
            other => panic!("expected shifted arc, got {:?}", other),
        }
        let inner = geometry
            .segments()
            .iter()
            .filter(|s| matches!(s, PathSegment::Arc { radius, .. } if *radius == 40.))
            .count();
        assert_eq!(inner, 1);
        assert_eq!(geometry.segments().len(), 4);
    }

    #[test]
    fn phase_scales_start_and_sweep() {
        let geometry = slice_geometry(&SliceGeometryParams {
            offset_angle: 100.,
            phase: 0.5,
            ..params(80.)
        });
        match geometry.segments()[0] {
            PathSegment::Arc {
                start_angle,
                sweep_angle,
                ..
            } => {
                assert!(close(start_angle, 50.));
                assert!(close(sweep_angle, 40.));
            }
            other => panic!("expected outer arc, got {:?}", other),
        }
    }

    #[test]
    fn quarter_slice_path_covers_a_quarter() {
        let path = slice_geometry(&params(90.)).to_path();
        let quarter = std::f64::consts::PI * 100. * 100. / 4.;
        assert!((path.area().abs() - quarter).abs() < 20.);
    }
}
