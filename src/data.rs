//! Data sets feeding the pie and radar charts.
//!
//! Entries are read through a [`ValueAccessor`] chosen when the data set is built, so any entry
//! type can be charted without the chart knowing its layout.
use crate::polar::NUMBER_EPSILON;
use std::fmt;

/// The default entry type: an x/y pair with an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

impl Entry {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, label: None }
    }

    /// A pie entry: only the value matters, `x` is left at zero.
    pub fn value(y: f64) -> Self {
        Self::new(0., y)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// How to read the x and y values of an entry.
pub struct ValueAccessor<E> {
    pub x: fn(&E) -> f64,
    pub y: fn(&E) -> f64,
}

impl<E> Clone for ValueAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ValueAccessor<E> {}

impl<E> fmt::Debug for ValueAccessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ValueAccessor")
    }
}

impl Default for ValueAccessor<Entry> {
    fn default() -> Self {
        Self {
            x: |e| e.x,
            y: |e| e.y,
        }
    }
}

/// Whether a value takes part in angle calculations.
///
/// Near-zero values get no slice, and non-finite values (NaN, infinities) are dropped entirely
/// so they can never poison the value sum.
#[inline]
pub fn is_visible_value(value: f64) -> bool {
    value.is_finite() && value.abs() > NUMBER_EPSILON
}

/// An ordered list of entries plus the per-set options the charts read.
#[derive(Debug, Clone)]
pub struct DataSet<E = Entry> {
    label: String,
    entries: Vec<E>,
    accessor: ValueAccessor<E>,
    visible: bool,
    highlight_enabled: bool,
    slice_space: f64,
    automatically_disable_slice_spacing: bool,
    selection_shift: f64,
}

impl DataSet<Entry> {
    pub fn new(label: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self::with_accessor(label, entries, ValueAccessor::default())
    }

    /// Build a data set of unlabelled values.
    pub fn from_values(label: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let entries = values.into_iter().map(Entry::value).collect();
        Self::new(label, entries)
    }
}

impl<E> DataSet<E> {
    pub const MAX_SLICE_SPACE: f64 = 20.;
    pub const DEFAULT_SELECTION_SHIFT: f64 = 18.;

    pub fn with_accessor(
        label: impl Into<String>,
        entries: Vec<E>,
        accessor: ValueAccessor<E>,
    ) -> Self {
        Self {
            label: label.into(),
            entries,
            accessor,
            visible: true,
            highlight_enabled: true,
            slice_space: 0.,
            automatically_disable_slice_spacing: false,
            selection_shift: Self::DEFAULT_SELECTION_SHIFT,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn x(&self, entry: &E) -> f64 {
        (self.accessor.x)(entry)
    }

    pub fn y(&self, entry: &E) -> f64 {
        (self.accessor.y)(entry)
    }

    /// The y value of the entry at `index`.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.entry(index).map(|e| self.y(e))
    }

    /// y values in entry order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| self.y(e))
    }

    /// Sum of the absolute values of all visible entries.
    pub fn abs_value_sum(&self) -> f64 {
        self.values()
            .filter(|v| is_visible_value(*v))
            .map(f64::abs)
            .sum()
    }

    pub fn visible_entry_count(&self) -> usize {
        self.values().filter(|v| is_visible_value(*v)).count()
    }

    /// Smallest and largest finite y value, or `None` when there is none.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.values()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    pub fn push(&mut self, entry: E) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, index: usize) -> Option<E> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn entries_mut(&mut self) -> &mut Vec<E> {
        &mut self.entries
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_highlight_enabled(&self) -> bool {
        self.highlight_enabled
    }

    pub fn set_highlight_enabled(&mut self, enabled: bool) {
        self.highlight_enabled = enabled;
    }

    /// Gap between pie slices in pixels.
    pub fn slice_space(&self) -> f64 {
        self.slice_space
    }

    /// Clamped to `[0, 20]`.
    pub fn set_slice_space(&mut self, space: f64) {
        let clamped = if space.is_nan() {
            0.
        } else {
            space.clamp(0., Self::MAX_SLICE_SPACE)
        };
        if clamped != space {
            log::debug!("slice space {} clamped to {}", space, clamped);
        }
        self.slice_space = clamped;
    }

    pub fn is_automatically_disable_slice_spacing(&self) -> bool {
        self.automatically_disable_slice_spacing
    }

    /// Drop slice spacing when the smallest slice would be swallowed by it.
    pub fn set_automatically_disable_slice_spacing(&mut self, enabled: bool) {
        self.automatically_disable_slice_spacing = enabled;
    }

    /// How far a highlighted slice sticks out, in pixels.
    pub fn selection_shift(&self) -> f64 {
        self.selection_shift
    }

    pub fn set_selection_shift(&mut self, shift: f64) {
        self.selection_shift = shift.max(0.);
    }
}

/// Several data sets drawn on the same radar web.
#[derive(Debug, Clone)]
pub struct RadarData<E = Entry> {
    sets: Vec<DataSet<E>>,
}

impl<E> RadarData<E> {
    pub fn new(sets: Vec<DataSet<E>>) -> Self {
        Self { sets }
    }

    pub fn data_sets(&self) -> &[DataSet<E>] {
        &self.sets
    }

    pub fn data_set(&self, index: usize) -> Option<&DataSet<E>> {
        self.sets.get(index)
    }

    pub fn data_set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn data_sets_mut(&mut self) -> &mut Vec<DataSet<E>> {
        &mut self.sets
    }

    /// Entry count of the largest data set; this defines the number of spokes.
    pub fn max_entry_count(&self) -> usize {
        self.sets
            .iter()
            .map(DataSet::entry_count)
            .max()
            .unwrap_or(0)
    }

    /// Value range over all data sets.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.sets
            .iter()
            .filter_map(DataSet::y_range)
            .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
    }
}
