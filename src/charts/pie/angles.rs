//! Per-slice sweep angles and their running totals.
use crate::data::is_visible_value;

/// Sweep and cumulative angles for every visible slice.
///
/// Tables are indexed by visible position. Entries whose value is near zero (or not finite) get
/// no slice at all; [`SliceAngles::entry_index`] maps a slice back to its data-set entry.
///
/// Buffers are reused across [`SliceAngles::calculate`] calls, so recomputing on every data
/// change does not allocate once the tables have grown to size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceAngles {
    draw_angles: Vec<f64>,
    absolute_angles: Vec<f64>,
    entry_indices: Vec<usize>,
}

impl SliceAngles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute fresh tables for `values` laid out over `max_angle` degrees.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        max_angle: f64,
        min_angle_for_slices: f64,
    ) -> Self {
        let mut angles = Self::new();
        angles.calculate(values, max_angle, min_angle_for_slices);
        angles
    }

    /// Rebuild the tables in place. Nothing from the previous calculation survives.
    pub fn calculate(
        &mut self,
        values: impl IntoIterator<Item = f64>,
        max_angle: f64,
        min_angle_for_slices: f64,
    ) {
        self.draw_angles.clear();
        self.absolute_angles.clear();
        self.entry_indices.clear();

        for (index, value) in values.into_iter().enumerate() {
            if is_visible_value(value) {
                self.entry_indices.push(index);
                self.draw_angles.push(value.abs());
            }
        }

        let count = self.draw_angles.len();
        let value_sum: f64 = self.draw_angles.iter().sum();
        if value_sum > 0. {
            for angle in &mut self.draw_angles {
                *angle = *angle / value_sum * max_angle;
            }
        } else {
            self.draw_angles.iter_mut().for_each(|a| *a = 0.);
        }

        if min_angle_for_slices != 0. {
            if count as f64 * min_angle_for_slices <= max_angle {
                redistribute_min_angle(&mut self.draw_angles, min_angle_for_slices);
            } else {
                log::warn!(
                    "{} slices cannot all get {} degrees out of {}, ignoring the minimum",
                    count,
                    min_angle_for_slices,
                    max_angle
                );
            }
        }

        let mut total = 0.;
        for angle in &self.draw_angles {
            total += angle;
            self.absolute_angles.push(total);
        }

        log::debug!(
            "rebuilt angle tables for {} slices, total sweep {}",
            count,
            total
        );
    }

    /// Sweep of each visible slice, in degrees.
    pub fn draw_angles(&self) -> &[f64] {
        &self.draw_angles
    }

    /// Angle at which each visible slice ends, measured from the chart's rotation.
    pub fn absolute_angles(&self) -> &[f64] {
        &self.absolute_angles
    }

    /// Angle at which the slice starts (the previous slice's absolute angle).
    pub fn start_angle(&self, slice: usize) -> f64 {
        match slice {
            0 => 0.,
            i => self.absolute_angles.get(i - 1).copied().unwrap_or(0.),
        }
    }

    pub fn len(&self) -> usize {
        self.draw_angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_angles.is_empty()
    }

    /// Data-set index of the entry behind visible slice `slice`.
    pub fn entry_index(&self, slice: usize) -> Option<usize> {
        self.entry_indices.get(slice).copied()
    }

    /// Visible slice drawn for data-set entry `entry`, if it has one.
    pub fn slice_for_entry(&self, entry: usize) -> Option<usize> {
        self.entry_indices.binary_search(&entry).ok()
    }

    /// The first slice whose absolute angle lies strictly beyond `angle`.
    ///
    /// `angle` must already be relative to the chart rotation and normalized. A slice boundary
    /// belongs to the following slice.
    pub fn index_for_angle(&self, angle: f64) -> Option<usize> {
        let index = self.absolute_angles.partition_point(|&a| a <= angle);
        (index < self.absolute_angles.len() && self.absolute_angles[index] > angle).then_some(index)
    }
}

/// Lift every slice below `min_angle` up to it, paying for the difference by shrinking the
/// larger slices in proportion to how far they exceed the minimum.
fn redistribute_min_angle(angles: &mut [f64], min_angle: f64) {
    let mut deficit = 0.;
    let mut surplus = 0.;
    for angle in angles.iter() {
        let diff = angle - min_angle;
        if diff <= 0. {
            deficit += -diff;
        } else {
            surplus += diff;
        }
    }

    for angle in angles.iter_mut() {
        let diff = *angle - min_angle;
        if diff <= 0. {
            *angle = min_angle;
        } else if surplus > 0. {
            *angle -= diff / surplus * deficit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_all_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn proportional_angles() {
        let angles = SliceAngles::from_values([10., 20., 30., 40.], 360., 0.);
        assert_all_close(angles.draw_angles(), &[36., 72., 108., 144.]);
        assert_all_close(angles.absolute_angles(), &[36., 108., 216., 360.]);
    }

    #[test]
    fn half_pie_and_negative_values() {
        let angles = SliceAngles::from_values([-1., 1.], 180., 0.);
        assert_all_close(angles.draw_angles(), &[90., 90.]);
    }

    #[test]
    fn invisible_entries_are_skipped() {
        let angles = SliceAngles::from_values([5., 0., f64::NAN, 5.], 360., 0.);
        assert_eq!(angles.len(), 2);
        assert_eq!(angles.entry_index(0), Some(0));
        assert_eq!(angles.entry_index(1), Some(3));
        assert_eq!(angles.entry_index(2), None);
        assert_eq!(angles.slice_for_entry(3), Some(1));
        assert_eq!(angles.slice_for_entry(1), None);
    }

    #[test]
    fn all_zero_values_give_no_slices() {
        let angles = SliceAngles::from_values([0., 0., 0., 0.], 360., 0.);
        assert!(angles.draw_angles().iter().all(|a| *a == 0.));
        assert_eq!(angles.index_for_angle(10.), None);
    }

    #[test]
    fn minimum_angle_is_enforced() {
        let angles = SliceAngles::from_values([1., 1., 98.], 360., 30.);
        let draw = angles.draw_angles();
        assert!((draw[0] - 30.).abs() < 1e-9);
        assert!((draw[1] - 30.).abs() < 1e-9);
        assert!((draw[2] - 300.).abs() < 1e-9);
        assert!((angles.absolute_angles()[2] - 360.).abs() < 1e-9);
    }

    #[test]
    fn infeasible_minimum_is_ignored() {
        let angles = SliceAngles::from_values([1., 1., 98.], 360., 150.);
        assert_all_close(angles.draw_angles(), &[3.6, 3.6, 352.8]);
    }

    #[test]
    fn boundary_belongs_to_next_slice() {
        let angles = SliceAngles::from_values([1., 1., 1.], 360., 0.);
        assert_eq!(angles.index_for_angle(0.), Some(0));
        assert_eq!(angles.index_for_angle(119.), Some(0));
        assert_eq!(angles.index_for_angle(120.), Some(1));
        assert_eq!(angles.index_for_angle(121.), Some(1));
        assert_eq!(angles.index_for_angle(359.9), Some(2));
        assert_eq!(angles.index_for_angle(360.), None);
    }

    #[test]
    fn recalculate_replaces_previous_tables() {
        let mut angles = SliceAngles::from_values([1., 2., 3., 4., 5.], 360., 0.);
        angles.calculate([1., 1.], 360., 0.);
        assert_all_close(angles.draw_angles(), &[180., 180.]);
        assert_eq!(angles.absolute_angles().len(), 2);
        assert_eq!(angles.start_angle(1), 180.);
    }

    proptest! {
        #[test]
        fn sweep_sums_to_max_angle(
            values in prop::collection::vec(0.01f64..1000.0, 1..64),
            max_angle in 90.0f64..=360.0,
        ) {
            let angles = SliceAngles::from_values(values, max_angle, 0.);
            let total: f64 = angles.draw_angles().iter().sum();
            prop_assert!((total - max_angle).abs() < 1e-6);
        }

        #[test]
        fn cumulative_angles_increase(values in prop::collection::vec(0.01f64..1000.0, 1..64)) {
            let angles = SliceAngles::from_values(values, 360., 0.);
            for pair in angles.absolute_angles().windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }

        #[test]
        fn feasible_minimum_holds(
            values in prop::collection::vec(0.01f64..1000.0, 1..24),
            min_angle in 1.0f64..15.0,
        ) {
            let angles = SliceAngles::from_values(values, 360., min_angle);
            let total: f64 = angles.draw_angles().iter().sum();
            prop_assert!((total - 360.).abs() < 1e-6);
            for angle in angles.draw_angles() {
                prop_assert!(*angle >= min_angle - 1e-9);
            }
        }
    }
}
