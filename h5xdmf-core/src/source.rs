//! Read-only access to the datasets of one series file.

/// A read-only view of the datasets stored in one file of a series.
///
/// Keys are `/`-joined dataset paths as produced by the schema
/// introspector. Implementations convert their own failures into
/// `Self::Error`; core failures (bad shapes, empty axes) arrive through the
/// `From<crate::Error>` bound.
pub trait DatasetSource {
    /// Error type of the backend.
    type Error: From<crate::Error>;

    /// Returns the extents of the dataset at `key`.
    ///
    /// # Errors
    /// Returns an error if the dataset does not exist or cannot be opened.
    fn shape(&self, key: &str) -> Result<Vec<usize>, Self::Error>;

    /// Reads the dataset at `key` as a flat sequence of `f64`.
    ///
    /// # Errors
    /// Returns an error if the dataset does not exist or cannot be converted.
    fn read_values(&self, key: &str) -> Result<Vec<f64>, Self::Error>;
}
