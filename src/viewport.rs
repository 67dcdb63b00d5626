//! Chart bounds as handed over by the host view.
use kurbo::{Insets, Point, Rect, Size};

/// The area a chart may draw into.
///
/// `chart` is the full view; `content` is what remains after offsets (legend, axis labels)
/// have been taken away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    chart: Rect,
    content: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        let chart = size.to_rect();
        Self {
            chart,
            content: chart,
        }
    }

    /// Shrink the content rect by the given offsets on each side.
    pub fn restrain(&mut self, offsets: Insets) {
        let content = self.chart - offsets;
        // offsets larger than the view leave an empty content rect rather than a negative one
        self.content = Rect::new(
            content.x0,
            content.y0,
            content.x1.max(content.x0),
            content.y1.max(content.y0),
        );
    }

    pub fn chart_rect(&self) -> Rect {
        self.chart
    }

    pub fn content_rect(&self) -> Rect {
        self.content
    }

    pub fn center(&self) -> Point {
        self.content.center()
    }

    /// Length of the shorter content side.
    pub fn smallest_content_extension(&self) -> f64 {
        self.content.width().min(self.content.height())
    }

    /// Diameter of the largest circle that fits the content rect, after `extra` insets.
    pub fn diameter(&self, extra: Insets) -> f64 {
        let content = self.content - extra;
        content.width().min(content.height()).max(0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restrain_moves_center_and_diameter() {
        let mut viewport = Viewport::new(Size::new(300., 200.));
        assert_eq!(viewport.center(), Point::new(150., 100.));
        assert_eq!(viewport.diameter(Insets::ZERO), 200.);

        viewport.restrain(Insets::new(100., 0., 0., 0.));
        assert_eq!(viewport.center(), Point::new(200., 100.));
        assert_eq!(viewport.smallest_content_extension(), 200.);
    }

    #[test]
    fn oversized_offsets_collapse_content() {
        let mut viewport = Viewport::new(Size::new(10., 10.));
        viewport.restrain(Insets::uniform(20.));
        assert_eq!(viewport.diameter(Insets::ZERO), 0.);
    }
}
