use super::RadarChart;
use crate::{
    draw::{Drawer, FillStyle, LineCap, LineJoin, PietDrawer, StrokeStyle},
    style::{Color, ColorPalette, DefaultPalette},
};
use kurbo::Circle;
use piet::RenderContext;
use std::fmt;

#[derive(Clone)]
pub struct RadarStyle {
    pub background_color: Color,
    pub web_color: Color,
    pub web_color_inner: Color,
    pub set_colors: Box<dyn ColorPalette + Send + Sync>,
    pub line_width: f64,
    // `None` leaves the surfaces unfilled
    pub fill_alpha: Option<u8>,
    pub highlight_circle_radius: f64,
    pub highlight_circle_outline: Option<StrokeStyle>,
}

impl fmt::Debug for RadarStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RadarStyle")
            .field("background_color", &self.background_color)
            .field("web_color", &self.web_color)
            .field("web_color_inner", &self.web_color_inner)
            .field("set_colors", &"dyn ColorPalette")
            .field("line_width", &self.line_width)
            .field("fill_alpha", &self.fill_alpha)
            .field("highlight_circle_radius", &self.highlight_circle_radius)
            .field("highlight_circle_outline", &self.highlight_circle_outline)
            .finish()
    }
}

impl RadarStyle {
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        let web = Color::rgba8(122, 122, 122, 150);
        Self {
            background_color: Color::TRANSPARENT,
            web_color: web,
            web_color_inner: web,
            set_colors: Box::new(DefaultPalette),
            line_width: 2.5,
            fill_alpha: Some(85),
            highlight_circle_radius: 4.,
            highlight_circle_outline: Some(StrokeStyle::new(Color::WHITE, 2.)),
        }
    }

    pub fn default_dark() -> Self {
        let mut this = Self::default();
        this.highlight_circle_outline = Some(StrokeStyle::new(Color::BLACK, 2.));
        this
    }
}

pub fn render<E: Clone, RC: RenderContext>(
    chart: &RadarChart<E>,
    style: &RadarStyle,
    ctx: &mut RC,
) -> Result<(), piet::Error> {
    ctx.clear(None, style.background_color.to_piet_color());
    draw_radar(chart, style, &mut PietDrawer::new(ctx));
    Ok(())
}

/// Draw the web, every data set surface, and the highlight marker onto any [`Drawer`].
pub fn draw_radar<E: Clone>(chart: &RadarChart<E>, style: &RadarStyle, drawer: &mut impl Drawer) {
    if chart.settings().draw_web {
        draw_web(chart, style, drawer);
    }

    for (set_index, set) in chart.data().data_sets().iter().enumerate() {
        if !set.is_visible() || set.entry_count() == 0 {
            continue;
        }
        let Some(surface) = chart.surface_path(set_index) else {
            continue;
        };
        let color = style.set_colors.color(set_index);
        let fill = style.fill_alpha.map(|a| FillStyle::new(color.with_alpha(a)));
        let outline = (style.line_width > 0.).then(|| {
            StrokeStyle::new(color, style.line_width).with_line_join(LineJoin::Round)
        });
        drawer.draw_shape(surface, outline, fill);
    }

    draw_highlighted(chart, style, drawer);
}

fn draw_web<E: Clone>(chart: &RadarChart<E>, style: &RadarStyle, drawer: &mut impl Drawer) {
    let settings = chart.settings();
    let spoke =
        StrokeStyle::new(style.web_color, settings.web_line_width).with_line_cap(LineCap::Round);
    for line in chart.web_spokes() {
        drawer.draw_shape(line, Some(spoke.clone()), None);
    }
    let ring = StrokeStyle::new(style.web_color_inner, settings.web_line_width_inner);
    for path in chart.web_rings() {
        drawer.draw_shape(path, Some(ring.clone()), None);
    }
}

fn draw_highlighted<E: Clone>(chart: &RadarChart<E>, style: &RadarStyle, drawer: &mut impl Drawer) {
    let Some(highlight) = chart.highlighted() else {
        return;
    };
    let Some(set) = chart.data().data_set(highlight.data_set_index) else {
        return;
    };
    if !set.is_visible() || !set.is_highlight_enabled() {
        return;
    }
    // the stored pixel goes stale after a rotation
    let Some(position) = chart.position(highlight.data_set_index, highlight.entry_index) else {
        return;
    };
    drawer.draw_shape(
        Circle::new(position, style.highlight_circle_radius),
        style.highlight_circle_outline.clone(),
        Some(FillStyle::new(style.set_colors.color(highlight.data_set_index))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        charts::radar::DEFAULT_STYLE,
        data::{DataSet, RadarData},
        polar::{chart_to_screen_angle, point_at_angle},
    };
    use kurbo::{Shape, Size};

    #[derive(Default)]
    struct Recorder {
        strokes: usize,
        fills: Vec<Color>,
    }

    impl Drawer for Recorder {
        fn draw_shape(
            &mut self,
            _shape: impl Shape,
            stroke_style: Option<StrokeStyle>,
            fill_style: Option<FillStyle>,
        ) {
            match (stroke_style, fill_style) {
                (_, Some(fill)) => self.fills.push(fill.color),
                (Some(_), None) => self.strokes += 1,
                (None, None) => {}
            }
        }
    }

    fn chart() -> RadarChart {
        let mut chart = RadarChart::new(RadarData::new(vec![
            DataSet::from_values("a", [1., 2., 3.]),
            DataSet::from_values("b", [3., 2., 1.]),
        ]));
        chart.set_size(Size::new(200., 200.));
        chart
    }

    #[test]
    fn draws_web_then_surfaces() {
        let chart = chart();
        let mut recorder = Recorder::default();
        draw_radar(&chart, &DEFAULT_STYLE, &mut recorder);
        // three spokes and five rings
        assert_eq!(recorder.strokes, 8);
        assert_eq!(recorder.fills.len(), 2);
        assert!(recorder.fills.iter().all(|c| c.a == 85));
    }

    #[test]
    fn hidden_sets_and_web_are_skipped() {
        let mut chart = chart();
        chart.update_data(|sets| sets[1].set_visible(false));
        let mut settings = chart.settings().clone();
        settings.draw_web = false;
        chart.set_settings(settings).expect("valid settings");

        let mut recorder = Recorder::default();
        draw_radar(&chart, &DEFAULT_STYLE, &mut recorder);
        assert_eq!(recorder.strokes, 0);
        assert_eq!(recorder.fills.len(), 1);
    }

    #[test]
    fn highlight_adds_a_marker() {
        let mut chart = chart();
        let tap = point_at_angle(chart.center(), 99., chart_to_screen_angle(0.));
        assert!(chart.tap(tap).is_some());
        let mut recorder = Recorder::default();
        draw_radar(&chart, &DEFAULT_STYLE, &mut recorder);
        assert_eq!(recorder.fills.len(), 3);
        assert_eq!(recorder.fills[2].a, 255);
    }
}
