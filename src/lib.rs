//! Pie and radar charts: slice angles, polar hit testing, and rendering through piet.
//!
//! ```no_run
//! use polarchart::{data::DataSet, PieChart};
//!
//! let mut chart = PieChart::new(DataSet::from_values("votes", [10., 20., 30., 40.]));
//! chart.set_size(kurbo::Size::new(400., 400.));
//! chart.to_svg_file("votes.svg", None)?;
//! # Ok::<(), polarchart::ChartError>(())
//! ```
pub mod animation;
pub mod charts;
pub mod data;
pub mod draw;
mod error;
pub mod highlight;
pub mod polar;
pub mod rotation;
pub mod style;
pub mod touch;
pub mod viewport;

pub use charts::{
    pie::{PieChart, PieSettings, PieStyle},
    radar::{RadarChart, RadarSettings, RadarStyle},
};
pub use error::{ChartError, Result};
