use kurbo::Vec2;
use polarchart::{
    data::{DataSet, RadarData},
    style::Color,
    touch::TouchEvent,
    RadarChart, RadarSettings, RadarStyle,
};
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data = RadarData::new(vec![
        DataSet::from_values("2023", [65., 59., 90., 81., 56., 55., 40.]),
        DataSet::from_values("2024", [28., 48., 40., 19., 96., 27., 100.]),
    ]);
    let settings = RadarSettings::default().with_axis_range(0., 100.);
    let mut chart = RadarChart::with_settings(data, settings)?;
    chart.set_size(kurbo::Size::new(800., 800.));

    // spin the chart as if it had been flung
    let start = Instant::now();
    let center = chart.center();
    chart.handle_touch(TouchEvent::Down(center + Vec2::new(0., -200.)), start);
    chart.handle_touch(
        TouchEvent::Move(center + Vec2::new(200., 0.)),
        start + Duration::from_millis(80),
    );
    chart.handle_touch(
        TouchEvent::Up(center + Vec2::new(200., 0.)),
        start + Duration::from_millis(100),
    );
    let mut now = start + Duration::from_millis(100);
    while chart.compute_scroll(now) {
        now += Duration::from_millis(16);
    }
    println!("settled at {:.1} degrees", chart.rotation_angle());

    let mut style = RadarStyle::default();
    style.background_color = Color::WHITE;
    chart.to_svg_file("radar.svg", Some(&style))?;
    Ok(())
}
