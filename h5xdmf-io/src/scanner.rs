//! Directory scanner for `.h5` time series.
//!
//! Files are ordered by lexical filename sort, which is assumed to match
//! time order. Each file's timestamp comes from the last digit run of its
//! name.

use crate::{Error, Result};
use h5xdmf_core::timestamp::{extract_timestamp, H5_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};

/// One file of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFile {
    /// File name relative to the series directory.
    pub name: String,
    /// Timestep value taken from the name.
    pub timestamp: u64,
}

/// Ordered `.h5` files of one directory.
#[derive(Debug, Clone)]
pub struct DatasetCollection {
    directory: PathBuf,
    files: Vec<SeriesFile>,
}

impl DatasetCollection {
    /// Directory that was scanned.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files in ascending name order.
    #[must_use]
    pub fn files(&self) -> &[SeriesFile] {
        &self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The representative file used for introspection and geometry.
    #[must_use]
    pub fn first(&self) -> Option<&SeriesFile> {
        self.files.first()
    }

    /// Full path of a file of this collection.
    #[must_use]
    pub fn path_of(&self, file: &SeriesFile) -> PathBuf {
        self.directory.join(&file.name)
    }
}

/// Lists the `.h5` files of `dir` in name order with their timestamps.
///
/// Entries that are not regular files are skipped.
///
/// # Errors
/// Returns an error if the directory cannot be read, a `.h5` name is not
/// valid UTF-8, or a name carries no timestamp digits.
pub fn scan_directory<P: AsRef<Path>>(dir: P) -> Result<DatasetCollection> {
    let directory = dir.as_ref().to_path_buf();
    let mut names = Vec::new();

    for entry in fs::read_dir(&directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            if Path::new(&name)
                .extension()
                .is_some_and(|ext| ext == "h5")
            {
                return Err(Error::InvalidFormat(format!(
                    "non UTF-8 file name: {}",
                    path.display()
                )));
            }
            continue;
        };
        if name.ends_with(H5_EXTENSION) {
            names.push(name.to_string());
        }
    }

    names.sort_unstable();

    let files = names
        .into_iter()
        .map(|name| -> Result<SeriesFile> {
            let timestamp = extract_timestamp(&name)?;
            Ok(SeriesFile { name, timestamp })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Found {} .h5 file(s) in {}",
        files.len(),
        directory.display()
    );

    Ok(DatasetCollection { directory, files })
}
