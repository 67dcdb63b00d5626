//! Mapping touch points back to chart values.
use crate::polar::{angle_for_point, distance_to_center};
use kurbo::Point;

/// A resolved hit: which value was touched, and where it sits on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight<E> {
    /// Position among the drawn slices (pie) or spokes (radar).
    pub slice_index: usize,
    /// Index of the entry inside its data set.
    pub entry_index: usize,
    pub data_set_index: usize,
    pub value: f64,
    pub x_px: f64,
    pub y_px: f64,
    pub entry: E,
}

impl<E> Highlight<E> {
    pub fn pixel(&self) -> Point {
        Point::new(self.x_px, self.y_px)
    }

    /// Whether both highlights point at the same value, wherever they were touched.
    pub fn same_value(&self, other: &Self) -> bool {
        self.entry_index == other.entry_index && self.data_set_index == other.data_set_index
    }
}

/// What the shared highlighting logic needs to know about a polar chart.
pub trait PolarChart {
    type Entry: Clone;

    fn center(&self) -> Point;

    fn radius(&self) -> f64;

    /// The phase the touch angle is divided by before lookup. Pie charts reveal their sweep with
    /// the y phase; radar charts are not affected.
    fn angular_phase(&self) -> f64 {
        1.
    }

    /// Index of the slice or spoke under the chart-frame `angle`, rotation not yet removed.
    fn index_for_angle(&self, angle: f64) -> Option<usize>;

    /// Number of valid indices `index_for_angle` may produce.
    fn index_count(&self) -> usize;
}

/// Hit testing shared by pie and radar charts.
///
/// The default [`highlight`](PieRadarHighlighter::highlight) resolves a touch to an index; each
/// chart kind only decides how that index becomes a [`Highlight`].
pub trait PieRadarHighlighter<C: PolarChart> {
    fn closest_highlight(&self, chart: &C, index: usize, point: Point)
        -> Option<Highlight<C::Entry>>;

    fn highlight(&self, chart: &C, point: Point) -> Option<Highlight<C::Entry>> {
        let center = chart.center();
        if distance_to_center(center, point) > chart.radius() {
            return None;
        }

        let phase = chart.angular_phase();
        if phase <= 0. {
            // nothing revealed yet
            return None;
        }
        let angle = angle_for_point(center, point) / phase;

        let index = chart.index_for_angle(angle)?;
        if index >= chart.index_count() {
            return None;
        }

        let highlight = self.closest_highlight(chart, index, point);
        log::trace!(
            "touch at ({:.1}, {:.1}) resolved to {:?}",
            point.x,
            point.y,
            highlight.as_ref().map(|h| (h.data_set_index, h.entry_index))
        );
        highlight
    }
}

/// Tap-to-highlight toggling.
///
/// A tap on nothing, or on the value that is already highlighted, clears the highlight. Any
/// other tap replaces it.
#[derive(Debug, Clone)]
pub struct TapHighlighter<E> {
    current: Option<Highlight<E>>,
}

impl<E> Default for TapHighlighter<E> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<E> TapHighlighter<E> {
    pub fn perform(&mut self, tapped: Option<Highlight<E>>) -> Option<&Highlight<E>> {
        self.current = match tapped {
            Some(h) if !self.current.as_ref().is_some_and(|c| c.same_value(&h)) => Some(h),
            _ => None,
        };
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Highlight<E>> {
        self.current.as_ref()
    }

    /// Highlight `highlight` directly, without toggling.
    pub fn set(&mut self, highlight: Option<Highlight<E>>) {
        self.current = highlight;
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::{chart_to_screen_angle, point_at_angle};

    /// Four quarter slices, index = quadrant.
    struct Quadrants {
        rotation: f64,
        phase: f64,
    }

    impl PolarChart for Quadrants {
        type Entry = usize;

        fn center(&self) -> Point {
            Point::new(50., 50.)
        }

        fn radius(&self) -> f64 {
            40.
        }

        fn angular_phase(&self) -> f64 {
            self.phase
        }

        fn index_for_angle(&self, angle: f64) -> Option<usize> {
            let a = crate::polar::normalize_angle(angle - self.rotation);
            Some((a / 90.) as usize)
        }

        fn index_count(&self) -> usize {
            4
        }
    }

    struct Quadrant;

    impl PieRadarHighlighter<Quadrants> for Quadrant {
        fn closest_highlight(
            &self,
            _chart: &Quadrants,
            index: usize,
            point: Point,
        ) -> Option<Highlight<usize>> {
            Some(Highlight {
                slice_index: index,
                entry_index: index,
                data_set_index: 0,
                value: index as f64,
                x_px: point.x,
                y_px: point.y,
                entry: index,
            })
        }
    }

    fn touch(chart: &Quadrants, angle: f64, distance: f64) -> Option<usize> {
        let p = point_at_angle(chart.center(), distance, chart_to_screen_angle(angle));
        Quadrant.highlight(chart, p).map(|h| h.entry_index)
    }

    #[test]
    fn resolves_by_angle() {
        let chart = Quadrants {
            rotation: 0.,
            phase: 1.,
        };
        assert_eq!(touch(&chart, 10., 20.), Some(0));
        assert_eq!(touch(&chart, 100., 20.), Some(1));
        assert_eq!(touch(&chart, 350., 39.), Some(3));
    }

    #[test]
    fn outside_radius_is_ignored() {
        let chart = Quadrants {
            rotation: 0.,
            phase: 1.,
        };
        assert_eq!(touch(&chart, 10., 41.), None);
    }

    #[test]
    fn phase_stretches_angles() {
        let chart = Quadrants {
            rotation: 0.,
            phase: 0.5,
        };
        // 60 degrees on screen is 120 on the fully revealed chart
        assert_eq!(touch(&chart, 60., 20.), Some(1));
        let hidden = Quadrants {
            rotation: 0.,
            phase: 0.,
        };
        assert_eq!(touch(&hidden, 60., 20.), None);
    }

    #[test]
    fn tap_toggles() {
        let make = |entry_index| Highlight {
            slice_index: entry_index,
            entry_index,
            data_set_index: 0,
            value: 1.,
            x_px: 0.,
            y_px: 0.,
            entry: (),
        };
        let mut tap = TapHighlighter::default();
        assert!(tap.perform(Some(make(1))).is_some());
        assert_eq!(tap.perform(Some(make(2))).map(|h| h.entry_index), Some(2));
        assert!(tap.perform(Some(make(2))).is_none());
        tap.perform(Some(make(0)));
        assert!(tap.perform(None).is_none());
        assert!(tap.current().is_none());
    }
}
