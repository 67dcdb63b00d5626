use super::PieChart;
use crate::{
    draw::{Drawer, FillStyle, PietDrawer, StrokeStyle},
    style::{Color, ColorPalette, DefaultPalette},
};
use kurbo::{Circle, CircleSegment, Point};
use piet::{RenderContext, Text, TextLayout, TextLayoutBuilder};
use std::{f64::consts::TAU, fmt, sync::Arc};

const PADDING: f64 = 10.;

#[derive(Clone)]
pub struct PieStyle {
    pub background_color: Color,
    // if `None` the chart description is not drawn
    pub description: Option<TextStyle>,
    // if `None` slices are not outlined
    pub slice_outline: Option<StrokeStyle>,
    pub slice_colors: Box<dyn ColorPalette + Send + Sync>,
    // if `None` values will not be drawn
    pub value_label: Option<TextStyle>,
    pub hole_color: Color,
    pub transparent_circle_color: Color,
    pub transparent_circle_alpha: u8,
}

impl fmt::Debug for PieStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PieStyle")
            .field("background_color", &self.background_color)
            .field("description", &self.description)
            .field("slice_outline", &self.slice_outline)
            .field("slice_colors", &"dyn ColorPalette")
            .field("value_label", &self.value_label)
            .field("hole_color", &self.hole_color)
            .field("transparent_circle_color", &self.transparent_circle_color)
            .field("transparent_circle_alpha", &self.transparent_circle_alpha)
            .finish()
    }
}

impl PieStyle {
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self {
            background_color: Color::TRANSPARENT,
            description: Some(TextStyle::default().with_bold(true)),
            slice_outline: Some(StrokeStyle::new(Color::WHITE, 1.)),
            slice_colors: Box::new(DefaultPalette),
            value_label: Some(TextStyle::default_dark().with_font_size(12.)),
            hole_color: Color::WHITE,
            transparent_circle_color: Color::WHITE,
            transparent_circle_alpha: 100,
        }
    }

    pub fn default_dark() -> Self {
        let mut this = Self::default();
        this.description = Some(TextStyle::default_dark().with_bold(true));
        this.slice_outline = Some(StrokeStyle::new(Color::BLACK, 1.));
        this.hole_color = Color::BLACK;
        this.transparent_circle_color = Color::BLACK;
        this
    }

    /// The same style without any text, for drawing surfaces that cannot lay out fonts.
    pub fn without_text(mut self) -> Self {
        self.description = None;
        self.value_label = None;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f64,
    pub bold: bool,
}

impl TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            font_size: 16.,
            bold: false,
        }
    }

    fn default_dark() -> Self {
        Self {
            color: Color::WHITE,
            font_size: 16.,
            bold: false,
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

pub fn render<E: Clone, RC: RenderContext>(
    chart: &PieChart<E>,
    style: &PieStyle,
    ctx: &mut RC,
) -> Result<(), piet::Error> {
    ctx.clear(None, style.background_color.to_piet_color());

    draw_pie(chart, style, &mut PietDrawer::new(ctx));

    if chart.settings().draw_values && chart.data().is_visible() {
        if let Some(ref label_style) = style.value_label {
            draw_values(chart, label_style, ctx)?;
        }
    }

    if let (Some(description), Some(description_style)) =
        (chart.description(), style.description.as_ref())
    {
        let text: Arc<str> = description.into();
        let layout = ctx
            .text()
            .new_text_layout(text)
            .apply_style(description_style)
            .build()?;
        let size = layout.size();
        let top_left = Point {
            x: chart.center().x - size.width * 0.5,
            y: PADDING,
        };
        ctx.draw_text(&layout, top_left);
    }
    Ok(())
}

/// Draw slices, the highlighted slice, and the hole onto any [`Drawer`].
pub fn draw_pie<E: Clone>(chart: &PieChart<E>, style: &PieStyle, drawer: &mut impl Drawer) {
    if !chart.data().is_visible() {
        draw_hole(chart, style, drawer);
        return;
    }
    let rounded = chart.rounded_slices();
    let angles = chart.angles();

    for slice in 0..angles.len() {
        let Some(entry_index) = angles.entry_index(slice) else {
            continue;
        };
        // drawn shifted out below; rounded slices keep their place
        if chart.needs_highlight(entry_index) && !rounded {
            continue;
        }
        let Some(geometry) = chart.slice_geometry(slice) else {
            continue;
        };
        drawer.draw_shape(
            geometry.to_path(),
            style.slice_outline.clone(),
            Some(FillStyle::new(style.slice_colors.color(entry_index))),
        );
    }

    draw_highlighted(chart, style, drawer);
    draw_hole(chart, style, drawer);
}

fn draw_highlighted<E: Clone>(chart: &PieChart<E>, style: &PieStyle, drawer: &mut impl Drawer) {
    if chart.rounded_slices() || !chart.data().is_highlight_enabled() {
        return;
    }
    let Some(highlight) = chart.highlighted() else {
        return;
    };
    let Some(slice) = chart.angles().slice_for_entry(highlight.entry_index) else {
        return;
    };
    if let Some(geometry) = chart.highlighted_slice_geometry(slice) {
        drawer.draw_shape(
            geometry.to_path(),
            style.slice_outline.clone(),
            Some(FillStyle::new(style.slice_colors.color(highlight.entry_index))),
        );
    }
}

fn draw_hole<E: Clone>(chart: &PieChart<E>, style: &PieStyle, drawer: &mut impl Drawer) {
    if !chart.settings().draw_hole {
        return;
    }
    let center = chart.center();
    let hole_radius = chart.hole_radius();

    if style.hole_color.is_visible() && hole_radius > 0. {
        drawer.draw_shape(
            Circle::new(center, hole_radius),
            None,
            Some(FillStyle::new(style.hole_color)),
        );
    }

    let circle_radius = chart.transparent_circle_radius();
    let animator = chart.animator();
    let color = style
        .transparent_circle_color
        .with_alpha(style.transparent_circle_alpha)
        .fade(animator.phase_x() * animator.phase_y());
    if circle_radius > hole_radius && color.is_visible() {
        let ring = CircleSegment {
            center,
            outer_radius: circle_radius,
            inner_radius: hole_radius,
            start_angle: 0.,
            sweep_angle: TAU,
        };
        drawer.draw_shape(ring, None, Some(FillStyle::new(color)));
    }
}

fn draw_values<E: Clone, RC: RenderContext>(
    chart: &PieChart<E>,
    label_style: &TextStyle,
    ctx: &mut RC,
) -> Result<(), piet::Error> {
    let percent = chart.settings().use_percent_values;
    for slice in 0..chart.angles().len() {
        let Some(entry_index) = chart.angles().entry_index(slice) else {
            continue;
        };
        let (Some(value), Some(label_center)) =
            (chart.percent_value(entry_index), chart.slice_center(slice))
        else {
            continue;
        };
        let text = if percent {
            format!("{:.0}%", value)
        } else {
            format!("{}", value)
        };
        let layout = ctx
            .text()
            .new_text_layout(text)
            .apply_style(label_style)
            .build()?;
        let layout_size = layout.size();
        let label_tl = Point {
            x: label_center.x - layout_size.width * 0.5,
            y: label_center.y - layout_size.height * 0.5,
        };
        ctx.draw_text(&layout, label_tl);
    }
    Ok(())
}

trait ApplyStyle {
    fn apply_style(self, style: &TextStyle) -> Self;
}

impl<T: TextLayoutBuilder> ApplyStyle for T {
    fn apply_style(self, style: &TextStyle) -> Self {
        let mut this =
            self.default_attribute(piet::TextAttribute::FontSize(px_to_pt(style.font_size)));
        if style.bold {
            this = this.default_attribute(piet::TextAttribute::Weight(piet::FontWeight::BOLD));
        }
        this.text_color(style.color.to_piet_color())
    }
}

fn px_to_pt(px: f64) -> f64 {
    0.75 * px
}
