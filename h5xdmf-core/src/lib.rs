//! h5xdmf-core: Core types and templating for XDMF generation.
//!
//! This crate holds everything that does not touch the filesystem or HDF5
//! directly: timestamp extraction, request types, grid geometry arithmetic,
//! and the XDMF fragment templates with their placeholder substitution.
//!
//! HDF5 access goes through the [`DatasetSource`] trait so the geometry code
//! can be driven by any backend.

pub mod error;
pub mod geometry;
pub mod request;
pub mod source;
pub mod template;
pub mod timestamp;

pub use error::{Error, Result};
pub use geometry::{
    field_geometry, particle_count, particle_count_for_attributes, Dimensions, GridGeometry,
    Origin, Spacing,
};
pub use request::{AxisSelection, DatasetKind, GenerationRequest, LoadRequest};
pub use source::DatasetSource;
pub use template::{field_fragments, particle_fragments, Fragments, Timestep};
pub use timestamp::extract_timestamp;
