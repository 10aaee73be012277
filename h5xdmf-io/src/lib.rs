//! h5xdmf-io: Filesystem and HDF5 side of XDMF generation.
//!
//! This crate scans series directories, introspects HDF5 files through the
//! `hdf5` crate, persists documents and fragments, and wires everything into
//! the [`generate`] and [`regenerate`] pipelines.
//!

mod error;
pub mod hdf5;
pub mod parts;
pub mod pipeline;
pub mod scanner;

pub use error::{Error, Result};
pub use self::hdf5::{describe_tree, list_leaf_paths, Hdf5Source, NodeKind, TreeEntry};
pub use parts::{load_fragments, write_document, write_fragments, FragmentPart};
pub use pipeline::{dataset_keys, generate, regenerate, GenerationReport};
pub use scanner::{scan_directory, DatasetCollection, SeriesFile};
