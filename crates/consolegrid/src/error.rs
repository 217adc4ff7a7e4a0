//! Error types for grid rendering.
//!
//! [`GridError`] is the single error type returned by every fallible grid
//! operation. Failures are never retried: the render pass that hit them is
//! abandoned and nothing is written to the output sink.

use thiserror::Error;

/// Boxed error returned by fallible column extractors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or rendering a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A column extractor failed for one of the records.
    #[error("failed to extract value for column '{column}': {source}")]
    Extract {
        column: String,
        #[source]
        source: BoxError,
    },

    /// Writing to, clearing, or resizing the output sink failed.
    #[error("output sink error: {0}")]
    Sink(#[from] std::io::Error),

    /// Invalid configuration (bad YAML, unknown color or border name).
    #[error("configuration error: {0}")]
    Config(String),

    /// A render was requested while another render of the same grid was running.
    #[error("grid is already rendering")]
    Reentrant,
}

impl From<serde_yaml::Error> for GridError {
    fn from(err: serde_yaml::Error) -> Self {
        GridError::Config(err.to_string())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
