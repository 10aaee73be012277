//! HDF5 schema introspection and dataset access.

use crate::{Error, Result};
use h5xdmf_core::DatasetSource;
use hdf5::{Dataset, File, Group};
use std::path::{Path, PathBuf};

/// Lists the leaf dataset paths below `group`.
///
/// Traversal is depth-first in the group's member-name order. Sub-groups are
/// descended with the accumulated `/`-joined prefix; only datasets are
/// emitted. Top-level datasets carry no leading slash. Named datatypes and
/// unresolvable links are skipped.
///
/// # Errors
/// Returns an error if a group's members cannot be listed.
pub fn list_leaf_paths(group: &Group) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    collect_leaf_paths(group, "", &mut keys)?;
    Ok(keys)
}

fn collect_leaf_paths(group: &Group, prefix: &str, keys: &mut Vec<String>) -> Result<()> {
    for name in group.member_names()? {
        let path = join_key(prefix, &name);
        if let Ok(child) = group.group(&name) {
            collect_leaf_paths(&child, &path, keys)?;
        } else if group.dataset(&name).is_ok() {
            keys.push(path);
        }
    }
    Ok(())
}

fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Kind of a node in the HDF5 hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset { shape: Vec<usize> },
}

/// One node of a file's hierarchy, as listed by [`describe_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// `/`-joined path from the root.
    pub path: String,
    /// Nesting depth, 0 for top-level members.
    pub depth: usize,
    pub node: NodeKind,
}

/// Lists every group and dataset of a file, depth-first, with dataset shapes.
///
/// # Errors
/// Returns an error if the file cannot be opened or a group cannot be listed.
pub fn describe_tree<P: AsRef<Path>>(path: P) -> Result<Vec<TreeEntry>> {
    let file = File::open(path)?;
    let mut entries = Vec::new();
    collect_tree(&file, "", 0, &mut entries)?;
    Ok(entries)
}

fn collect_tree(group: &Group, prefix: &str, depth: usize, entries: &mut Vec<TreeEntry>) -> Result<()> {
    for name in group.member_names()? {
        let path = join_key(prefix, &name);
        if let Ok(child) = group.group(&name) {
            entries.push(TreeEntry {
                path: path.clone(),
                depth,
                node: NodeKind::Group,
            });
            collect_tree(&child, &path, depth + 1, entries)?;
        } else if let Ok(dataset) = group.dataset(&name) {
            entries.push(TreeEntry {
                path,
                depth,
                node: NodeKind::Dataset {
                    shape: dataset.shape(),
                },
            });
        }
    }
    Ok(())
}

/// One open file of a series, read through [`DatasetSource`].
pub struct Hdf5Source {
    file: File,
    path: PathBuf,
}

impl Hdf5Source {
    /// Opens an HDF5 file read-only.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leaf dataset paths of the whole file.
    ///
    /// # Errors
    /// Returns an error if a group cannot be listed.
    pub fn leaf_paths(&self) -> Result<Vec<String>> {
        list_leaf_paths(&self.file)
    }

    fn dataset(&self, key: &str) -> Result<Dataset> {
        self.file.dataset(key).map_err(|source| Error::Dataset {
            key: key.to_string(),
            path: self.path.clone(),
            source,
        })
    }
}

impl DatasetSource for Hdf5Source {
    type Error = Error;

    fn shape(&self, key: &str) -> Result<Vec<usize>> {
        Ok(self.dataset(key)?.shape())
    }

    fn read_values(&self, key: &str) -> Result<Vec<f64>> {
        self.dataset(key)?
            .read_raw::<f64>()
            .map_err(|source| Error::Dataset {
                key: key.to_string(),
                path: self.path.clone(),
                source,
            })
    }
}
