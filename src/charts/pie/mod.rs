use crate::{
    animation::Animator,
    data::{DataSet, Entry},
    error::{ChartError, Result},
    highlight::{Highlight, PieRadarHighlighter, PolarChart, TapHighlighter},
    polar::{chart_to_screen_angle, normalize_angle, point_at_angle},
    rotation::{RotationGesture, RotationState},
    touch::{TouchAction, TouchController, TouchEvent},
    viewport::Viewport,
};
use kurbo::{Insets, Point, Rect, Size};
use once_cell::sync::Lazy;
use piet::RenderContext;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, time::Instant};

pub mod angles;
pub mod geometry;
pub mod parse;
mod render;

pub use angles::SliceAngles;
pub use geometry::{SliceGeometry, SliceGeometryParams};
pub use parse::PieDefinition;
pub use render::{draw_pie, PieStyle, TextStyle};

use geometry::{highlighted_slice_geometry, rounded_slice_radius, slice_geometry};

/// The default style used with [`PieChart::render`].
pub static DEFAULT_STYLE: Lazy<PieStyle> = Lazy::new(PieStyle::default);
pub static DARK_STYLE: Lazy<PieStyle> = Lazy::new(PieStyle::default_dark);

/// Settings a fresh [`PieChart`] starts from.
pub static DEFAULT_SETTINGS: Lazy<PieSettings> = Lazy::new(PieSettings::default);

/// Size of the SVG canvas used by [`PieChart::to_svg`].
const SVG_SIZE: Size = Size::new(800., 800.);

/// Pie chart options.
///
/// Out-of-range values are clamped when the settings are handed to a chart. Non-finite values
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieSettings {
    /// Total sweep of all slices, `[90, 360]`.
    pub max_angle: f64,
    /// Smallest sweep any visible slice may get, `[0, max_angle / 2]`. `0` disables it.
    pub min_angle_for_slices: f64,
    /// Where the first slice starts, clockwise from 12 o'clock.
    pub rotation_angle: f64,
    pub rotation_enabled: bool,
    pub highlight_per_tap: bool,
    pub drag_deceleration: bool,
    /// Velocity kept per fling step, `[0, 0.999]`.
    pub drag_deceleration_friction: f64,
    pub draw_hole: bool,
    pub draw_slices_under_hole: bool,
    pub draw_rounded_slices: bool,
    /// Hole radius in percent of the chart radius.
    pub hole_radius_percent: f64,
    /// Outer radius of the translucent ring around the hole, in percent of the chart radius.
    pub transparent_circle_radius_percent: f64,
    pub use_percent_values: bool,
    pub draw_values: bool,
    /// Extra space kept free on every side of the pie.
    pub extra_offset: f64,
}

impl Default for PieSettings {
    fn default() -> Self {
        Self {
            max_angle: 360.,
            min_angle_for_slices: 0.,
            rotation_angle: 0.,
            rotation_enabled: true,
            highlight_per_tap: true,
            drag_deceleration: true,
            drag_deceleration_friction: 0.9,
            draw_hole: true,
            draw_slices_under_hole: false,
            draw_rounded_slices: false,
            hole_radius_percent: 50.,
            transparent_circle_radius_percent: 55.,
            use_percent_values: false,
            draw_values: true,
            extra_offset: 0.,
        }
    }
}

impl PieSettings {
    pub fn with_max_angle(mut self, max_angle: f64) -> Self {
        self.max_angle = max_angle;
        self
    }

    pub fn with_min_angle_for_slices(mut self, min_angle: f64) -> Self {
        self.min_angle_for_slices = min_angle;
        self
    }

    pub fn with_rotation_angle(mut self, angle: f64) -> Self {
        self.rotation_angle = angle;
        self
    }

    pub fn with_hole(mut self, draw_hole: bool) -> Self {
        self.draw_hole = draw_hole;
        self
    }

    pub fn with_hole_radius_percent(mut self, percent: f64) -> Self {
        self.hole_radius_percent = percent;
        self
    }

    pub fn with_rounded_slices(mut self, rounded: bool) -> Self {
        self.draw_rounded_slices = rounded;
        self
    }

    pub fn with_percent_values(mut self, percent: bool) -> Self {
        self.use_percent_values = percent;
        self
    }

    /// Reject non-finite numbers, then clamp everything into range.
    pub fn validated(mut self) -> Result<Self> {
        for (name, value) in [
            ("max_angle", self.max_angle),
            ("min_angle_for_slices", self.min_angle_for_slices),
            ("rotation_angle", self.rotation_angle),
            ("drag_deceleration_friction", self.drag_deceleration_friction),
            ("hole_radius_percent", self.hole_radius_percent),
            (
                "transparent_circle_radius_percent",
                self.transparent_circle_radius_percent,
            ),
            ("extra_offset", self.extra_offset),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidSettings { name, value });
            }
        }
        self.max_angle = clamp_max_angle(self.max_angle);
        self.min_angle_for_slices = clamp_min_angle(self.min_angle_for_slices, self.max_angle);
        self.hole_radius_percent = self.hole_radius_percent.clamp(0., 100.);
        self.transparent_circle_radius_percent =
            self.transparent_circle_radius_percent.clamp(0., 100.);
        self.extra_offset = self.extra_offset.max(0.);
        Ok(self)
    }
}

fn clamp_max_angle(max_angle: f64) -> f64 {
    max_angle.clamp(90., 360.)
}

fn clamp_min_angle(min_angle: f64, max_angle: f64) -> f64 {
    min_angle.clamp(0., max_angle / 2.)
}

/// A pie (or doughnut) chart over a single data set.
///
/// Slice angles are rebuilt whenever the data or the angle settings change, so the tables read
/// by drawing and hit testing always match the data.
#[derive(Debug, Clone)]
pub struct PieChart<E = Entry> {
    data: DataSet<E>,
    settings: PieSettings,
    description: Option<String>,
    angles: SliceAngles,
    rotation: RotationState,
    viewport: Viewport,
    animator: Animator,
    circle_box: Rect,
    highlighter: PieHighlighter,
    tap: TapHighlighter<E>,
    touch: TouchController,
}

impl PieChart<Entry> {
    /// Build a chart from a text definition, see [`parse`].
    pub fn parse(src: &str) -> Result<Self> {
        parse::parse(src)?.into_chart()
    }
}

impl<E: Clone> PieChart<E> {
    pub fn new(data: DataSet<E>) -> Self {
        let settings = DEFAULT_SETTINGS.clone();
        let gesture = RotationGesture::new(
            settings.drag_deceleration,
            settings.drag_deceleration_friction,
        );
        let mut chart = Self {
            data,
            rotation: RotationState::new(settings.rotation_angle),
            touch: TouchController::new(settings.rotation_enabled, gesture),
            settings,
            description: None,
            angles: SliceAngles::new(),
            viewport: Viewport::default(),
            animator: Animator::default(),
            circle_box: Rect::ZERO,
            highlighter: PieHighlighter,
            tap: TapHighlighter::default(),
        };
        chart.calc_angles();
        chart
    }

    pub fn with_settings(data: DataSet<E>, settings: PieSettings) -> Result<Self> {
        let mut chart = Self::new(data);
        chart.set_settings(settings)?;
        Ok(chart)
    }

    pub fn data(&self) -> &DataSet<E> {
        &self.data
    }

    /// Replace the data set. Any highlight is dropped.
    pub fn set_data(&mut self, data: DataSet<E>) {
        self.data = data;
        self.tap.clear();
        self.notify_data_changed();
    }

    /// Mutate the data set in place; angles are rebuilt afterwards.
    ///
    /// Adding or removing entries drops the highlight, since its entry index may now point at a
    /// different value.
    pub fn update_data<R>(&mut self, f: impl FnOnce(&mut DataSet<E>) -> R) -> R {
        let count = self.data.entry_count();
        let out = f(&mut self.data);
        if self.data.entry_count() != count {
            self.tap.clear();
        }
        self.notify_data_changed();
        out
    }

    fn notify_data_changed(&mut self) {
        self.calc_angles();
        self.calculate_offsets();
        // a highlight must keep pointing at a drawn slice
        if let Some(h) = self.tap.current() {
            if self.angles.slice_for_entry(h.entry_index).is_none() {
                self.tap.clear();
            }
        }
    }

    pub fn settings(&self) -> &PieSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PieSettings) -> Result<()> {
        let settings = settings.validated()?;
        self.rotation.set(settings.rotation_angle);
        self.touch.set_rotation_enabled(settings.rotation_enabled);
        let gesture = self.touch.gesture_mut();
        gesture.set_deceleration_enabled(settings.drag_deceleration);
        gesture.set_friction(settings.drag_deceleration_friction);
        self.settings = settings;
        self.calc_angles();
        self.calculate_offsets();
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn max_angle(&self) -> f64 {
        self.settings.max_angle
    }

    /// Total sweep of the pie, clamped to `[90, 360]`.
    pub fn set_max_angle(&mut self, max_angle: f64) {
        if max_angle.is_nan() {
            return;
        }
        self.settings.max_angle = clamp_max_angle(max_angle);
        self.settings.min_angle_for_slices =
            clamp_min_angle(self.settings.min_angle_for_slices, self.settings.max_angle);
        self.calc_angles();
    }

    pub fn min_angle_for_slices(&self) -> f64 {
        self.settings.min_angle_for_slices
    }

    /// Smallest sweep per visible slice, clamped to `[0, max_angle / 2]`.
    pub fn set_min_angle_for_slices(&mut self, min_angle: f64) {
        if min_angle.is_nan() {
            return;
        }
        self.settings.min_angle_for_slices = clamp_min_angle(min_angle, self.settings.max_angle);
        self.calc_angles();
    }

    fn calc_angles(&mut self) {
        self.angles.calculate(
            self.data.values(),
            self.settings.max_angle,
            self.settings.min_angle_for_slices,
        );
    }

    pub fn angles(&self) -> &SliceAngles {
        &self.angles
    }

    pub fn draw_angles(&self) -> &[f64] {
        self.angles.draw_angles()
    }

    pub fn absolute_angles(&self) -> &[f64] {
        self.angles.absolute_angles()
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Normalized rotation, in `[0, 360)`.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation.normalized()
    }

    pub fn raw_rotation_angle(&self) -> f64 {
        self.rotation.raw()
    }

    pub fn set_rotation_angle(&mut self, angle: f64) {
        self.rotation.set(angle);
        self.settings.rotation_angle = angle;
    }

    /// Rotate by `delta` degrees, clockwise for positive values.
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

    /// The host view changed size.
    pub fn set_size(&mut self, size: Size) {
        self.viewport = Viewport::new(size);
        self.calculate_offsets();
    }

    /// Keep `offsets` free around the content (legend, labels).
    pub fn restrain_viewport(&mut self, offsets: Insets) {
        self.viewport.restrain(offsets);
        self.calculate_offsets();
    }

    /// Fit the circle box into the content rect, leaving room for a highlighted slice to stick
    /// out by the selection shift.
    fn calculate_offsets(&mut self) {
        let radius = self.viewport.diameter(Insets::uniform(self.settings.extra_offset)) / 2.;
        let half = (radius - self.data.selection_shift()).max(0.);
        let c = self.viewport.center();
        self.circle_box = Rect::new(c.x - half, c.y - half, c.x + half, c.y + half);
    }

    /// The bounds of the pie, highlight shift excluded.
    pub fn circle_box(&self) -> Rect {
        self.circle_box
    }

    pub fn center(&self) -> Point {
        self.circle_box.center()
    }

    pub fn radius(&self) -> f64 {
        (self.circle_box.width() / 2.).min(self.circle_box.height() / 2.)
    }

    /// Hole radius in pixels, `0` without a hole.
    pub fn hole_radius(&self) -> f64 {
        if self.settings.draw_hole {
            self.radius() * self.settings.hole_radius_percent / 100.
        } else {
            0.
        }
    }

    /// Outer radius of the translucent ring around the hole.
    pub fn transparent_circle_radius(&self) -> f64 {
        self.radius() * self.settings.transparent_circle_radius_percent / 100.
    }

    /// Visible slice under the chart-frame `angle`, with the chart rotation not yet removed.
    pub fn index_for_angle(&self, angle: f64) -> Option<usize> {
        self.angles
            .index_for_angle(normalize_angle(angle - self.rotation.normalized()))
    }

    /// Slice spacing as actually drawn.
    ///
    /// A lone slice has nothing to keep apart from. With automatic disabling on, spacing is also
    /// dropped once it would eat the smallest slice.
    pub fn slice_space(&self) -> f64 {
        if self.angles.len() <= 1 {
            return 0.;
        }
        let space = self.data.slice_space();
        if !self.data.is_automatically_disable_slice_spacing() {
            return space;
        }

        let sum = self.data.abs_value_sum();
        let smallest = self
            .data
            .values()
            .filter(|v| crate::data::is_visible_value(*v))
            .map(f64::abs)
            .fold(f64::INFINITY, f64::min);
        let spaced_min = space / self.viewport.smallest_content_extension();
        if spaced_min > smallest / sum * 2. {
            0.
        } else {
            space
        }
    }

    /// Whether the entry at `entry_index` is highlighted.
    pub fn needs_highlight(&self, entry_index: usize) -> bool {
        self.tap
            .current()
            .is_some_and(|h| h.entry_index == entry_index)
    }

    pub fn highlighted(&self) -> Option<&Highlight<E>> {
        self.tap.current()
    }

    /// Highlight a value programmatically. Highlights of entries without a slice are ignored.
    pub fn highlight_value(&mut self, highlight: Option<Highlight<E>>) {
        let highlight =
            highlight.filter(|h| self.angles.slice_for_entry(h.entry_index).is_some());
        self.tap.set(highlight);
    }

    pub fn clear_highlight(&mut self) {
        self.tap.clear();
    }

    /// The value under `point`, if any. Does not change the current highlight.
    pub fn highlight_at(&self, point: Point) -> Option<Highlight<E>> {
        self.highlighter.highlight(self, point)
    }

    /// A tap at `point`: toggles the highlight the way a user expects.
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

    /// Advance a fling to `now`. Returns `true` while it is still running.
    pub fn compute_scroll(&mut self, now: Instant) -> bool {
        let running = self.touch.compute_scroll(&mut self.rotation, now);
        self.settings.rotation_angle = self.rotation.raw();
        running
    }

    /// Where a marker for `highlight` goes: on the middle of its slice, inside the ring.
    pub fn marker_position(&self, highlight: &Highlight<E>) -> Option<Point> {
        let slice = self.angles.slice_for_entry(highlight.entry_index)?;
        self.slice_center(slice)
    }

    /// The middle of visible slice `slice`, halfway into the ring (or a bit out from the center
    /// without a hole). Value labels and markers are placed here.
    pub fn slice_center(&self, slice: usize) -> Option<Point> {
        let absolute = *self.angles.absolute_angles().get(slice)?;
        let mut r = self.radius();
        let offset = if self.settings.draw_hole {
            (r - r / 100. * self.settings.hole_radius_percent) / 2.
        } else {
            r / 10. * 3.6
        };
        r -= offset;

        let middle = absolute - self.angles.draw_angles()[slice] / 2.;
        let angle = chart_to_screen_angle(self.rotation.normalized())
            + middle * self.animator.phase_y();
        Some(point_at_angle(self.center(), r, angle))
    }

    /// The entry's value as shown in labels: percent of the total, or the plain value.
    pub fn percent_value(&self, entry_index: usize) -> Option<f64> {
        let value = self.data.value_at(entry_index)?;
        if !self.settings.use_percent_values {
            return Some(value);
        }
        let sum = self.data.abs_value_sum();
        Some(if sum > 0. { value / sum * 100. } else { 0. })
    }

    pub(crate) fn draws_inner_arc(&self) -> bool {
        self.settings.draw_hole && !self.settings.draw_slices_under_hole
    }

    pub(crate) fn rounded_slices(&self) -> bool {
        self.settings.draw_rounded_slices && self.draws_inner_arc()
    }

    /// Geometry inputs for visible slice `slice`.
    pub fn slice_params(&self, slice: usize) -> Option<SliceGeometryParams> {
        let slice_angle = *self.angles.draw_angles().get(slice)?;
        let radius = self.radius();
        let draw_inner_arc = self.draws_inner_arc();
        Some(SliceGeometryParams {
            center: self.center(),
            radius,
            inner_radius: if draw_inner_arc { self.hole_radius() } else { 0. },
            draw_inner_arc,
            slice_space: self.slice_space(),
            rotation: chart_to_screen_angle(self.rotation.normalized()),
            offset_angle: self.angles.start_angle(slice) * self.animator.phase_x(),
            slice_angle,
            phase: self.animator.phase_y(),
            rounded_radius: self
                .rounded_slices()
                .then(|| rounded_slice_radius(radius, self.settings.hole_radius_percent)),
        })
    }

    /// Outline of visible slice `slice` at rest.
    pub fn slice_geometry(&self, slice: usize) -> Option<SliceGeometry> {
        self.slice_params(slice).map(|p| slice_geometry(&p))
    }

    /// Outline of visible slice `slice` pushed out by the selection shift.
    pub fn highlighted_slice_geometry(&self, slice: usize) -> Option<SliceGeometry> {
        self.slice_params(slice)
            .map(|p| highlighted_slice_geometry(&p, self.data.selection_shift()))
    }

    pub fn render<RC: RenderContext>(&self, ctx: &mut RC) -> Result<()> {
        self.render_with_style(&DEFAULT_STYLE, ctx)
    }

    pub fn render_with_style<RC: RenderContext>(&self, style: &PieStyle, ctx: &mut RC) -> Result<()> {
        render::render(self, style, ctx)?;
        Ok(())
    }

    /// Render onto an 800x800 SVG canvas. The chart is laid out to fill it.
    pub fn to_svg(&self, writer: impl io::Write, style: Option<&PieStyle>) -> Result<()> {
        let mut chart = self.clone();
        chart.set_size(SVG_SIZE);
        let mut rc = piet_svg::RenderContext::new(SVG_SIZE);
        chart.render_with_style(style.unwrap_or(&DEFAULT_STYLE), &mut rc)?;
        rc.write(writer)?;
        Ok(())
    }

    pub fn to_svg_file(&self, filename: impl AsRef<Path>, style: Option<&PieStyle>) -> Result<()> {
        let file = io::BufWriter::new(fs::File::create(filename)?);
        self.to_svg(file, style)
    }
}

impl<E: Clone> PolarChart for PieChart<E> {
    type Entry = E;

    fn center(&self) -> Point {
        PieChart::center(self)
    }

    fn radius(&self) -> f64 {
        PieChart::radius(self)
    }

    fn angular_phase(&self) -> f64 {
        self.animator.phase_y()
    }

    fn index_for_angle(&self, angle: f64) -> Option<usize> {
        PieChart::index_for_angle(self, angle)
    }

    fn index_count(&self) -> usize {
        if self.data.is_visible() {
            self.angles.len()
        } else {
            0
        }
    }
}

/// Maps a slice back to the entry it was drawn for.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieHighlighter;

impl<E: Clone> PieRadarHighlighter<PieChart<E>> for PieHighlighter {
    fn closest_highlight(
        &self,
        chart: &PieChart<E>,
        index: usize,
        point: Point,
    ) -> Option<Highlight<E>> {
        let data = chart.data();
        if !data.is_visible() || !data.is_highlight_enabled() {
            return None;
        }
        let entry_index = chart.angles().entry_index(index)?;
        let entry = data.entry(entry_index)?;
        Some(Highlight {
            slice_index: index,
            entry_index,
            data_set_index: 0,
            value: data.y(entry),
            x_px: point.x,
            y_px: point.y,
            entry: entry.clone(),
        })
    }
}
