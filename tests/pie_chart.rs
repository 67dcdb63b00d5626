use kurbo::{Point, Size};
use polarchart::{
    data::DataSet,
    polar::{chart_to_screen_angle, point_at_angle},
    touch::TouchEvent,
    PieChart, PieSettings, PieStyle,
};
use std::time::{Duration, Instant};

const SIZE: Size = Size::new(236., 236.);

fn pie(values: &[f64]) -> PieChart {
    let mut chart = PieChart::new(DataSet::from_values("test", values.iter().copied()));
    chart.set_size(SIZE);
    chart
}

/// A point at the chart-frame `angle`, `distance` pixels out from the center.
fn touch(chart: &PieChart, angle: f64, distance: f64) -> Point {
    point_at_angle(chart.center(), distance, chart_to_screen_angle(angle))
}

fn assert_all_near(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn proportional_angles() {
    let chart = pie(&[10., 20., 30., 40.]);
    assert_all_near(chart.draw_angles(), &[36., 72., 108., 144.]);
    assert_all_near(chart.absolute_angles(), &[36., 108., 216., 360.]);
}

#[test]
fn touch_outside_radius_misses() {
    let chart = pie(&[1., 2.]);
    let radius = chart.radius();
    assert!(chart.highlight_at(touch(&chart, 10., radius - 1.)).is_some());
    assert!(chart.highlight_at(touch(&chart, 10., radius + 1.)).is_none());
}

#[test]
fn slice_boundary_belongs_to_later_slice() {
    let chart = pie(&[1., 1., 1.]);
    let r = chart.radius() / 2.;
    let before = chart.highlight_at(touch(&chart, 119., r)).expect("hit");
    assert_eq!(before.slice_index, 0);
    let after = chart.highlight_at(touch(&chart, 121., r)).expect("hit");
    assert_eq!(after.slice_index, 1);
}

#[test]
fn zero_sum_data_never_highlights() {
    let chart = pie(&[0., 0., 0., 0.]);
    assert_all_near(chart.draw_angles(), &[]);
    for angle in [0., 90., 180., 270., 359.] {
        assert!(chart.highlight_at(touch(&chart, angle, 50.)).is_none());
    }
}

#[test]
fn lone_slice_is_not_spaced() {
    let mut chart = pie(&[0., 5., 0.]);
    chart.update_data(|set| set.set_slice_space(10.));
    assert_eq!(chart.slice_space(), 0.);
    assert_eq!(chart.slice_params(0).expect("slice").slice_space, 0.);

    chart.update_data(|set| set.push(polarchart::data::Entry::value(5.)));
    assert_eq!(chart.slice_space(), 10.);
}

#[test]
fn invisible_entries_keep_their_index() {
    let chart = pie(&[4., 0., f64::NAN, 4.]);
    let h = chart.highlight_at(touch(&chart, 270., 50.)).expect("hit");
    assert_eq!((h.slice_index, h.entry_index), (1, 3));
    assert_eq!(h.value, 4.);
}

#[test]
fn rotation_moves_slices_under_the_finger() {
    let mut chart = pie(&[1., 3.]);
    // quarter slice spans 0..90 before rotating
    assert_eq!(chart.highlight_at(touch(&chart, 45., 50.)).expect("hit").entry_index, 0);
    chart.set_rotation_angle(-450.);
    assert_eq!(chart.rotation_angle(), 270.);
    assert_eq!(chart.highlight_at(touch(&chart, 300., 50.)).expect("hit").entry_index, 0);
}

#[test]
fn taps_toggle_the_highlight() {
    let mut chart = pie(&[1., 1.]);
    let p = touch(&chart, 90., 50.);
    assert_eq!(chart.tap(p).map(|h| h.entry_index), Some(0));
    // same value again clears
    assert!(chart.tap(p).is_none());
    chart.tap(p);
    assert_eq!(chart.tap(touch(&chart, 270., 50.)).map(|h| h.entry_index), Some(1));
    // outside clears
    assert!(chart.tap(Point::ZERO).is_none());
    assert!(chart.highlighted().is_none());
}

#[test]
fn drag_rotates_and_release_taps() {
    let mut chart = pie(&[1., 1.]);
    let start = Instant::now();
    let north = touch(&chart, 0., 80.);
    let east = touch(&chart, 90., 80.);

    assert!(!chart.handle_touch(TouchEvent::Down(north), start));
    assert!(chart.handle_touch(TouchEvent::Move(east), start + Duration::from_millis(50)));
    chart.handle_touch(TouchEvent::Up(east), start + Duration::from_millis(100));
    assert!((chart.rotation_angle() - 90.).abs() < 1e-6);
    assert!(chart.highlighted().is_none());

    let p = touch(&chart, 200., 50.);
    let later = start + Duration::from_secs(5);
    chart.handle_touch(TouchEvent::Down(p), later);
    assert!(chart.handle_touch(TouchEvent::Up(p), later));
    assert!(chart.highlighted().is_some());
}

#[test]
fn rotation_can_be_disabled() {
    let settings = PieSettings {
        rotation_enabled: false,
        ..PieSettings::default()
    };
    let mut chart = PieChart::with_settings(DataSet::from_values("t", [1., 1.]), settings)
        .expect("valid settings");
    chart.set_size(SIZE);
    let now = Instant::now();
    chart.handle_touch(TouchEvent::Down(touch(&chart, 0., 80.)), now);
    assert!(!chart.handle_touch(TouchEvent::Move(touch(&chart, 90., 80.)), now));
    assert_eq!(chart.rotation_angle(), 0.);
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = PieSettings {
        hole_radius_percent: f64::NAN,
        ..PieSettings::default()
    };
    let err = PieChart::with_settings(DataSet::from_values("t", [1.]), settings)
        .expect_err("nan percent");
    assert!(err.to_string().contains("hole_radius_percent"));
}

#[test]
fn parsed_definition_renders_to_svg() {
    let chart = PieChart::parse(
        r#"pie
    "Dogs" : 386
    "Cats" : 85
    "Rats" : 15"#,
    )
    .expect("valid definition");
    assert_eq!(chart.data().entry_count(), 3);

    let mut out = Vec::new();
    chart
        .to_svg(&mut out, Some(&PieStyle::default().without_text()))
        .expect("render");
    let svg = String::from_utf8(out).expect("utf8");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<path"));
}

#[test]
fn empty_chart_renders_blank() {
    let chart = pie(&[]);
    assert!(chart.slice_geometry(0).is_none());
    let mut out = Vec::new();
    chart
        .to_svg(&mut out, Some(&PieStyle::default().without_text()))
        .expect("render");
    assert!(!out.is_empty());
}
