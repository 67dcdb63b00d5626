use anyhow::Context;
use kurbo::Point;
use polarchart::{charts::pie, style::Color, PieChart};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut chart = PieChart::parse(
        r#"
pie showData
    title Key elements in Product X
    "Calcium" : 42.96
    "Potassium" : 50.05
    "Magnesium" : 10.01
    "Iron" :  5
    "#,
    )
    .context("parsing the pie definition")?;

    let settings = chart.settings().clone().with_rotation_angle(30.);
    chart.set_settings(settings)?;
    chart.update_data(|set| set.set_slice_space(3.));

    chart.set_size(kurbo::Size::new(800., 800.));
    let tapped = chart.tap(Point::new(560., 400.)).cloned();
    println!("{:#?}", tapped);

    let mut style = (*pie::DEFAULT_STYLE).clone();
    style.background_color = Color::WHITE;
    chart.to_svg_file("pie.svg", Some(&style))?;
    Ok(())
}
