//! Error types for chart construction and rendering

use thiserror::Error;

/// Errors that can occur while laying out or rendering a metrics chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Results mapping is empty")]
    EmptyResults,
    #[error("Duplicate learner: {0}")]
    DuplicateLearner(String),
    #[error("Learner {learner} is missing metric {metric}")]
    MissingMetric { learner: String, metric: String },
    #[error("Learner {learner} has non-finite {metric}: {value}")]
    InvalidMetricValue {
        learner: String,
        metric: String,
        value: f64,
    },
    #[error("Palette exhausted: {learners} learners but only {colors} colors")]
    PaletteExhausted { learners: usize, colors: usize },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("No panel at row {row}, column {col}")]
    PanelOutOfRange { row: usize, col: usize },
    #[error("Render error: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// A specialized Result type for chart operations
pub type Result<T> = std::result::Result<T, Error>;
