//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HDF5 library error.
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Dataset could not be opened or read.
    #[error("dataset {key} in {}: {source}", .path.display())]
    Dataset {
        key: String,
        path: PathBuf,
        source: hdf5::Error,
    },

    /// Invalid file format.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Directory holds no `.h5` files.
    #[error("no .h5 files found in {}", .0.display())]
    NoDatasets(PathBuf),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] h5xdmf_core::Error),
}
