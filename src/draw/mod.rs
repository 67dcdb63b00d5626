//! The draw surface charts paint onto.
//!
//! You don't need to look here unless you want to draw with something other than piet.

use crate::style::Color;
use kurbo::Shape;
use piet::RenderContext;

/// A trait that you can implement to draw in your preferred way.
///
/// [`PietDrawer`] draws onto any piet render context (SVG, bitmap, ..).
///
/// The structure of this trait emphasizes simplicity over performance. Charts are redrawn every
/// frame, so implementations should not retain anything between draws.
pub trait Drawer {
    fn draw_shape(
        &mut self,
        shape: impl Shape,
        stroke_style: Option<StrokeStyle>,
        fill_style: Option<FillStyle>,
    );
}

#[derive(Debug, Clone)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            line_cap: Default::default(),
            line_join: Default::default(),
        }
    }

    pub fn with_line_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    pub fn with_line_cap(mut self, line_cap: LineCap) -> Self {
        self.line_cap = line_cap;
        self
    }

    fn to_piet_style(&self) -> piet::StrokeStyle {
        let join = match self.line_join {
            LineJoin::Miter { limit } => piet::LineJoin::Miter { limit },
            LineJoin::Round => piet::LineJoin::Round,
            LineJoin::Bevel => piet::LineJoin::Bevel,
        };
        let cap = match self.line_cap {
            LineCap::Butt => piet::LineCap::Butt,
            LineCap::Round => piet::LineCap::Round,
            LineCap::Square => piet::LineCap::Square,
        };
        piet::StrokeStyle::new().line_join(join).line_cap(cap)
    }
}

#[derive(Debug, Clone)]
pub struct FillStyle {
    pub color: Color,
}

impl FillStyle {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// How two stroked segments meet.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    /// Edges extended until they meet, beveled once longer than `limit`.
    Miter { limit: f64 },
    Round,
    Bevel,
}

impl LineJoin {
    pub const DEFAULT_MITER_LIMIT: f64 = 10.0;
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter {
            limit: LineJoin::DEFAULT_MITER_LIMIT,
        }
    }
}

/// How an open stroke ends.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    /// Squared off half a line width past the end point.
    Square,
}

/// Adapts a piet [`RenderContext`] to [`Drawer`].
pub struct PietDrawer<'a, RC> {
    ctx: &'a mut RC,
}

impl<'a, RC: RenderContext> PietDrawer<'a, RC> {
    pub fn new(ctx: &'a mut RC) -> Self {
        Self { ctx }
    }
}

impl<RC: RenderContext> Drawer for PietDrawer<'_, RC> {
    fn draw_shape(
        &mut self,
        shape: impl Shape,
        stroke_style: Option<StrokeStyle>,
        fill_style: Option<FillStyle>,
    ) {
        // fill first so the outline stays on top
        if let Some(fill) = fill_style {
            let brush = self.ctx.solid_brush(fill.color.to_piet_color());
            self.ctx.fill(&shape, &brush);
        }
        if let Some(stroke) = stroke_style {
            let brush = self.ctx.solid_brush(stroke.color.to_piet_color());
            self.ctx
                .stroke_styled(&shape, &brush, stroke.width, &stroke.to_piet_style());
        }
    }
}
