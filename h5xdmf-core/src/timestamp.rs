//! Timestamp extraction from series filenames.

use crate::{Error, Result};

/// Extension of the files that make up a series.
pub const H5_EXTENSION: &str = ".h5";

/// Extracts the timestep value from a series filename.
///
/// The `.h5` extension is stripped first, then the last run of ASCII digits
/// is parsed. `"run42_7.h5"` yields `7`.
///
/// # Errors
/// Returns [`Error::MissingTimestamp`] if the name has no digit run or the
/// run does not fit in a `u64`.
pub fn extract_timestamp(filename: &str) -> Result<u64> {
    let stem = filename.strip_suffix(H5_EXTENSION).unwrap_or(filename);
    let bytes = stem.as_bytes();

    let Some(end) = bytes.iter().rposition(u8::is_ascii_digit) else {
        return Err(Error::MissingTimestamp(filename.to_string()));
    };
    let start = bytes[..end]
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |i| i + 1);

    stem[start..=end]
        .parse()
        .map_err(|_| Error::MissingTimestamp(filename.to_string()))
}
