//! Error types for h5xdmf-core.

use thiserror::Error;

/// Result type alias for h5xdmf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for h5xdmf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filename carries no digit run to use as a timestamp.
    #[error("no timestamp digits in file name: {0}")]
    MissingTimestamp(String),

    /// Dataset shape cannot be used for the requested computation.
    #[error("unsupported shape {shape:?} for dataset {key}")]
    InvalidShape { key: String, shape: Vec<usize> },

    /// Axis coordinate array holds no values.
    #[error("axis dataset {0} is empty")]
    EmptyAxis(String),

    /// No attribute datasets were selected.
    #[error("at least one attribute must be selected")]
    NoAttributes,

    /// Attribute key listed more than once.
    #[error("attribute selected more than once: {0}")]
    DuplicateAttribute(String),

    /// Filename contains a template placeholder token.
    #[error("file name {filename} contains placeholder {token}")]
    PlaceholderCollision { filename: String, token: &'static str },

    /// Request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// JSON request could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
