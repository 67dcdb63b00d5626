use crate::charts::pie::parse;
use std::io;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The backend failed to draw. piet errors are not `Send`, so only the message is kept.
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("invalid pie definition {0}")]
    Parse(#[from] parse::Error),
    #[error("invalid value {value} for `{name}`")]
    InvalidSettings { name: &'static str, value: f64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<piet::Error> for ChartError {
    fn from(e: piet::Error) -> Self {
        Self::Render(e.to_string())
    }
}
