use crate::{
    animation::Animator,
    data::{DataSet, Entry, RadarData},
    error::{ChartError, Result},
    highlight::{Highlight, PieRadarHighlighter, PolarChart, TapHighlighter},
    polar::{chart_to_screen_angle, distance_to_center, normalize_angle, point_at_angle},
    rotation::{RotationGesture, RotationState},
    touch::{TouchAction, TouchController, TouchEvent},
    viewport::Viewport,
};
use kurbo::{BezPath, Insets, Line, Point, Size};
use once_cell::sync::Lazy;
use piet::RenderContext;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, time::Instant};

mod render;

pub use render::{draw_radar, RadarStyle};

/// The default style used with [`RadarChart::render`].
pub static DEFAULT_STYLE: Lazy<RadarStyle> = Lazy::new(RadarStyle::default);

const SVG_SIZE: Size = Size::new(800., 800.);

/// Upper bound for `web_ring_count`.
pub const MAX_WEB_RINGS: usize = 100;

/// Radar chart options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarSettings {
    /// Direction of the first spoke, clockwise from 12 o'clock.
    pub rotation_angle: f64,
    pub rotation_enabled: bool,
    pub highlight_per_tap: bool,
    pub drag_deceleration: bool,
    pub drag_deceleration_friction: f64,
    pub draw_web: bool,
    /// Width of the spokes.
    pub web_line_width: f64,
    /// Width of the rings between the spokes.
    pub web_line_width_inner: f64,
    /// Spokes left out between two drawn ones.
    pub skip_web_line_count: usize,
    /// Number of rings, the outermost one included.
    pub web_ring_count: usize,
    /// Value at the center. Defaults to the smaller of `0` and the data minimum.
    pub axis_minimum: Option<f64>,
    /// Value at the rim. Defaults to the data maximum.
    pub axis_maximum: Option<f64>,
}

impl Default for RadarSettings {
    fn default() -> Self {
        Self {
            rotation_angle: 0.,
            rotation_enabled: true,
            highlight_per_tap: true,
            drag_deceleration: true,
            drag_deceleration_friction: 0.9,
            draw_web: true,
            web_line_width: 2.5,
            web_line_width_inner: 1.5,
            skip_web_line_count: 0,
            web_ring_count: 5,
            axis_minimum: None,
            axis_maximum: None,
        }
    }
}

impl RadarSettings {
    pub fn with_axis_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.axis_minimum = Some(minimum);
        self.axis_maximum = Some(maximum);
        self
    }

    pub fn with_skip_web_line_count(mut self, count: usize) -> Self {
        self.skip_web_line_count = count;
        self
    }

    pub fn with_rotation_angle(mut self, angle: f64) -> Self {
        self.rotation_angle = angle;
        self
    }

    fn validated(mut self) -> Result<Self> {
        let optional = |v: Option<f64>| v.unwrap_or(0.);
        for (name, value) in [
            ("rotation_angle", self.rotation_angle),
            ("drag_deceleration_friction", self.drag_deceleration_friction),
            ("web_line_width", self.web_line_width),
            ("web_line_width_inner", self.web_line_width_inner),
            ("axis_minimum", optional(self.axis_minimum)),
            ("axis_maximum", optional(self.axis_maximum)),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidSettings { name, value });
            }
        }
        if self.web_ring_count > MAX_WEB_RINGS {
            log::debug!(
                "web ring count {} clamped to {}",
                self.web_ring_count,
                MAX_WEB_RINGS
            );
            self.web_ring_count = MAX_WEB_RINGS;
        }
        Ok(self)
    }
}

/// Several data sets drawn as polygons over a shared web of spokes.
///
/// Every entry index gets a spoke; the value sets the distance from the center.
#[derive(Debug, Clone)]
pub struct RadarChart<E = Entry> {
    data: RadarData<E>,
    settings: RadarSettings,
    rotation: RotationState,
    viewport: Viewport,
    animator: Animator,
    highlighter: RadarHighlighter,
    tap: TapHighlighter<E>,
    touch: TouchController,
}

impl<E: Clone> RadarChart<E> {
    pub fn new(data: RadarData<E>) -> Self {
        let settings = RadarSettings::default();
        let gesture = RotationGesture::new(
            settings.drag_deceleration,
            settings.drag_deceleration_friction,
        );
        Self {
            data,
            rotation: RotationState::new(settings.rotation_angle),
            touch: TouchController::new(settings.rotation_enabled, gesture),
            settings,
            viewport: Viewport::default(),
            animator: Animator::default(),
            highlighter: RadarHighlighter,
            tap: TapHighlighter::default(),
        }
    }

    pub fn with_settings(data: RadarData<E>, settings: RadarSettings) -> Result<Self> {
        let mut chart = Self::new(data);
        chart.set_settings(settings)?;
        Ok(chart)
    }

    pub fn data(&self) -> &RadarData<E> {
        &self.data
    }

    /// Replace the data. Any highlight is dropped.
    pub fn set_data(&mut self, data: RadarData<E>) {
        self.data = data;
        self.tap.clear();
    }

    /// Mutate the data sets in place.
    ///
    /// Adding or removing sets or entries drops the highlight, since its indices may now point
    /// at a different value.
    pub fn update_data<R>(&mut self, f: impl FnOnce(&mut Vec<DataSet<E>>) -> R) -> R {
        let counts = self.entry_counts();
        let out = f(self.data.data_sets_mut());
        if self.entry_counts() != counts {
            self.tap.clear();
        }
        out
    }

    fn entry_counts(&self) -> Vec<usize> {
        self.data.data_sets().iter().map(DataSet::entry_count).collect()
    }

    pub fn settings(&self) -> &RadarSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RadarSettings) -> Result<()> {
        let settings = settings.validated()?;
        self.rotation.set(settings.rotation_angle);
        self.touch.set_rotation_enabled(settings.rotation_enabled);
        let gesture = self.touch.gesture_mut();
        gesture.set_deceleration_enabled(settings.drag_deceleration);
        gesture.set_friction(settings.drag_deceleration_friction);
        self.settings = settings;
        Ok(())
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation.normalized()
    }

    pub fn set_rotation_angle(&mut self, angle: f64) {
        self.rotation.set(angle);
        self.settings.rotation_angle = angle;
    }

    pub fn rotate_by(&mut self, delta: f64) {
        self.rotation.rotate_by(delta);
        self.settings.rotation_angle = self.rotation.raw();
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_size(&mut self, size: Size) {
        self.viewport = Viewport::new(size);
    }

    pub fn restrain_viewport(&mut self, offsets: Insets) {
        self.viewport.restrain(offsets);
    }

    pub fn center(&self) -> Point {
        self.viewport.center()
    }

    pub fn radius(&self) -> f64 {
        self.viewport.diameter(Insets::ZERO) / 2.
    }

    /// Values at the center and at the rim.
    pub fn axis_range(&self) -> (f64, f64) {
        let (data_min, data_max) = self.data.y_range().unwrap_or((0., 0.));
        let min = self.settings.axis_minimum.unwrap_or(data_min.min(0.));
        let max = self.settings.axis_maximum.unwrap_or(data_max).max(min);
        (min, max)
    }

    pub fn y_range(&self) -> f64 {
        let (min, max) = self.axis_range();
        max - min
    }

    /// Pixels per value unit. `0` when all values are equal.
    pub fn factor(&self) -> f64 {
        let range = self.y_range();
        if range > 0. {
            self.radius() / range
        } else {
            0.
        }
    }

    /// Angle between two neighbouring spokes.
    pub fn slice_angle(&self) -> f64 {
        match self.data.max_entry_count() {
            0 => 0.,
            count => 360. / count as f64,
        }
    }

    /// The spoke closest to the chart-frame `angle`, rotation not yet removed.
    pub fn index_for_angle(&self, angle: f64) -> Option<usize> {
        let max = self.data.max_entry_count();
        if max == 0 {
            return None;
        }
        let a = normalize_angle(angle - self.rotation.normalized());
        let slice = self.slice_angle();
        // past the last spoke's half slice wraps back to the first
        let index = (0..max)
            .find(|&i| slice * (i + 1) as f64 - slice / 2. > a)
            .unwrap_or(0);
        Some(index)
    }

    fn spoke_angle(&self, index: f64) -> f64 {
        chart_to_screen_angle(self.rotation.normalized()) + self.slice_angle() * index
    }

    /// Where the value of entry `entry_index` of data set `set_index` is drawn.
    pub fn position(&self, set_index: usize, entry_index: usize) -> Option<Point> {
        let set = self.data.data_set(set_index)?;
        let y = set.value_at(entry_index)?;
        if !y.is_finite() {
            return None;
        }
        let (min, _) = self.axis_range();
        Some(point_at_angle(
            self.center(),
            (y - min) * self.factor() * self.animator.phase_y(),
            self.spoke_angle(entry_index as f64 * self.animator.phase_x()),
        ))
    }

    /// The closed outline of data set `set_index`.
    ///
    /// Sets with fewer entries than the largest one are pulled back to the center before
    /// closing.
    pub fn surface_path(&self, set_index: usize) -> Option<BezPath> {
        let set = self.data.data_set(set_index)?;
        let mut path = BezPath::new();
        for p in (0..set.entry_count()).filter_map(|i| self.position(set_index, i)) {
            if path.elements().is_empty() {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        if path.elements().is_empty() {
            return None;
        }
        if set.entry_count() < self.data.max_entry_count() {
            path.line_to(self.center());
        }
        path.close_path();
        Some(path)
    }

    /// Lines from the center out to the rim, one every `1 + skip_web_line_count` spokes.
    pub fn web_spokes(&self) -> Vec<Line> {
        let center = self.center();
        let radius = self.y_range() * self.factor();
        (0..self.data.max_entry_count())
            .step_by(self.settings.skip_web_line_count.saturating_add(1))
            .map(|i| Line::new(center, point_at_angle(center, radius, self.spoke_angle(i as f64))))
            .collect()
    }

    /// Evenly spaced rings connecting the spokes, innermost first.
    pub fn web_rings(&self) -> Vec<BezPath> {
        let count = self.data.max_entry_count();
        let rings = self.settings.web_ring_count.min(MAX_WEB_RINGS);
        if count == 0 || rings == 0 {
            return Vec::new();
        }
        let center = self.center();
        let outer = self.y_range() * self.factor();
        (1..=rings)
            .map(|level| {
                let r = outer * level as f64 / rings as f64;
                let mut ring = BezPath::new();
                ring.move_to(point_at_angle(center, r, self.spoke_angle(0.)));
                for i in 1..count {
                    ring.line_to(point_at_angle(center, r, self.spoke_angle(i as f64)));
                }
                ring.close_path();
                ring
            })
            .collect()
    }

    pub fn needs_highlight(&self, set_index: usize, entry_index: usize) -> bool {
        self.tap
            .current()
            .is_some_and(|h| h.data_set_index == set_index && h.entry_index == entry_index)
    }

    pub fn highlighted(&self) -> Option<&Highlight<E>> {
        self.tap.current()
    }

    pub fn highlight_value(&mut self, highlight: Option<Highlight<E>>) {
        self.tap.set(highlight);
    }

    pub fn clear_highlight(&mut self) {
        self.tap.clear();
    }

    /// The value under `point`, if any. Does not change the current highlight.
    pub fn highlight_at(&self, point: Point) -> Option<Highlight<E>> {
        self.highlighter.highlight(self, point)
    }

    pub fn tap(&mut self, point: Point) -> Option<&Highlight<E>> {
        let tapped = self.highlight_at(point);
        self.tap.perform(tapped)
    }

    /// Feed a pointer event. Returns `true` when the chart needs redrawing.
    pub fn handle_touch(&mut self, event: TouchEvent, now: Instant) -> bool {
        let center = self.center();
        let action = self.touch.handle(event, &mut self.rotation, center, now);
        self.settings.rotation_angle = self.rotation.raw();
        match action {
            TouchAction::None => false,
            TouchAction::Rotated | TouchAction::Fling => true,
            TouchAction::Tap(point) => {
                if self.settings.highlight_per_tap {
                    self.tap(point);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn compute_scroll(&mut self, now: Instant) -> bool {
        let running = self.touch.compute_scroll(&mut self.rotation, now);
        self.settings.rotation_angle = self.rotation.raw();
        running
    }

    pub fn render<RC: RenderContext>(&self, ctx: &mut RC) -> Result<()> {
        self.render_with_style(&DEFAULT_STYLE, ctx)
    }

    pub fn render_with_style<RC: RenderContext>(
        &self,
        style: &RadarStyle,
        ctx: &mut RC,
    ) -> Result<()> {
        render::render(self, style, ctx)?;
        Ok(())
    }

    pub fn to_svg(&self, writer: impl io::Write, style: Option<&RadarStyle>) -> Result<()> {
        let mut chart = self.clone();
        chart.set_size(SVG_SIZE);
        let mut rc = piet_svg::RenderContext::new(SVG_SIZE);
        chart.render_with_style(style.unwrap_or(&DEFAULT_STYLE), &mut rc)?;
        rc.write(writer)?;
        Ok(())
    }

    pub fn to_svg_file(&self, filename: impl AsRef<Path>, style: Option<&RadarStyle>) -> Result<()> {
        let file = io::BufWriter::new(fs::File::create(filename)?);
        self.to_svg(file, style)
    }
}

impl<E: Clone> PolarChart for RadarChart<E> {
    type Entry = E;

    fn center(&self) -> Point {
        RadarChart::center(self)
    }

    fn radius(&self) -> f64 {
        RadarChart::radius(self)
    }

    fn index_for_angle(&self, angle: f64) -> Option<usize> {
        RadarChart::index_for_angle(self, angle)
    }

    fn index_count(&self) -> usize {
        self.data.max_entry_count()
    }
}

/// Picks, among all data sets, the value on the touched spoke that lies closest to the touch.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarHighlighter;

impl<E: Clone> PieRadarHighlighter<RadarChart<E>> for RadarHighlighter {
    fn closest_highlight(
        &self,
        chart: &RadarChart<E>,
        index: usize,
        point: Point,
    ) -> Option<Highlight<E>> {
        let factor = chart.factor();
        if factor <= 0. {
            return None;
        }
        let touched = distance_to_center(chart.center(), point) / factor;
        let (min, _) = chart.axis_range();

        let mut closest: Option<(f64, Highlight<E>)> = None;
        for (set_index, set) in chart.data().data_sets().iter().enumerate() {
            if !set.is_visible() || !set.is_highlight_enabled() {
                continue;
            }
            let Some(entry) = set.entry(index) else {
                continue;
            };
            let y = set.y(entry);
            let Some(position) = chart.position(set_index, index) else {
                continue;
            };
            let distance = ((y - min) - touched).abs();
            if closest.as_ref().is_some_and(|(best, _)| *best <= distance) {
                continue;
            }
            closest = Some((
                distance,
                Highlight {
                    slice_index: index,
                    entry_index: index,
                    data_set_index: set_index,
                    value: y,
                    x_px: position.x,
                    y_px: position.y,
                    entry: entry.clone(),
                },
            ));
        }
        closest.map(|(_, h)| h)
    }
}
