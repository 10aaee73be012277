//! End-to-end XDMF generation.
//!
//! Stages run strictly in sequence: scan, introspect, compute geometry,
//! render, persist. The first failure aborts the run; files already written
//! stay on disk.

use crate::hdf5::Hdf5Source;
use crate::parts::{load_fragments, write_document, write_fragments};
use crate::scanner::{scan_directory, DatasetCollection};
use crate::{Error, Result};
use h5xdmf_core::geometry::{particle_count, particle_count_for_attributes};
use h5xdmf_core::template::check_filename;
use h5xdmf_core::{
    field_geometry, field_fragments, particle_fragments, DatasetKind, DatasetSource, Fragments,
    GenerationRequest, LoadRequest, Timestep,
};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Written `.xdmf` document.
    pub document: PathBuf,
    /// Written fragment parts, empty when none were written.
    pub fragments: Vec<PathBuf>,
    /// Number of rendered timesteps.
    pub timesteps: usize,
}

/// How `%NPART%` is filled for each file.
#[derive(Debug, Clone, Copy)]
enum ParticleCount<'a> {
    /// Field series carry no particle count.
    Zero,
    /// Shape of an explicit count dataset.
    Key(&'a str),
    /// Shape of the first selected attribute.
    Attributes(&'a [String]),
}

impl<'a> ParticleCount<'a> {
    /// An explicit count key wins over the attribute fallback.
    fn select(kind: DatasetKind, count_key: Option<&'a str>, attributes: &'a [String]) -> Self {
        match (kind, count_key) {
            (DatasetKind::Fields, _) => ParticleCount::Zero,
            (DatasetKind::Particles, Some(key)) => ParticleCount::Key(key),
            (DatasetKind::Particles, None) => ParticleCount::Attributes(attributes),
        }
    }
}

/// Lists the dataset keys of the first `.h5` file in `dir`.
///
/// # Errors
/// Returns an error if the directory cannot be scanned, holds no `.h5`
/// file, or the first file cannot be read.
pub fn dataset_keys<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let collection = scan_series(dir.as_ref())?;
    first_source(&collection)?.leaf_paths()
}

/// Generates fresh fragments and writes the XDMF document for a series.
///
/// Fragments are also persisted unless `write_parts` is off.
///
/// # Errors
/// Returns an error if the request is invalid, the directory holds no
/// usable `.h5` files, a dataset cannot be read, or an output cannot be
/// written.
pub fn generate(request: &GenerationRequest) -> Result<GenerationReport> {
    request.validate()?;
    let collection = scan_series(&request.directory)?;

    let fragments = {
        let first = first_source(&collection)?;
        match request.kind {
            DatasetKind::Fields => {
                let geometry = field_geometry(&first, &request.axes, &request.attributes)?;
                info!(
                    "Grid {}x{}x{} (x, y, z) from {}",
                    geometry.dimensions.x,
                    geometry.dimensions.y,
                    geometry.dimensions.z,
                    first.path().display()
                );
                field_fragments(
                    &request.base_name,
                    &request.axes,
                    &request.attributes,
                    &geometry,
                )
            }
            DatasetKind::Particles => {
                particle_fragments(&request.base_name, &request.axes, &request.attributes)
            }
        }
    };

    let count = ParticleCount::select(request.kind, request.count_key(), &request.attributes);

    let out_dir = request.output_dir();
    let (document, timesteps) =
        render_series(&collection, &fragments, count, out_dir, &request.base_name)?;

    let fragments = if request.write_parts {
        write_fragments(out_dir, &request.base_name, &fragments)?
    } else {
        Vec::new()
    };

    Ok(GenerationReport {
        document,
        fragments,
        timesteps,
    })
}

/// Re-renders previously saved fragments against the current series.
///
/// Geometry is not recomputed; particle series re-read each file's count.
///
/// # Errors
/// Returns an error if the request is invalid, a fragment cannot be read,
/// the series cannot be scanned or read, or the document cannot be written.
pub fn regenerate(request: &LoadRequest) -> Result<GenerationReport> {
    request.validate()?;
    let collection = scan_series(&request.directory)?;
    let fragments = load_fragments(&request.header, &request.body, &request.footer)?;

    // validate() guarantees a count key for particle series.
    let count = ParticleCount::select(request.kind, request.count_key(), &[]);

    let (document, timesteps) = render_series(
        &collection,
        &fragments,
        count,
        request.output_dir(),
        &request.base_name,
    )?;

    Ok(GenerationReport {
        document,
        fragments: Vec::new(),
        timesteps,
    })
}

fn scan_series(dir: &Path) -> Result<DatasetCollection> {
    let collection = scan_directory(dir)?;
    if collection.is_empty() {
        return Err(Error::NoDatasets(dir.to_path_buf()));
    }
    for file in collection.files() {
        check_filename(&file.name)?;
    }
    info!(
        "Series of {} file(s) in {}",
        collection.len(),
        dir.display()
    );
    Ok(collection)
}

fn first_source(collection: &DatasetCollection) -> Result<Hdf5Source> {
    let first = collection
        .first()
        .ok_or_else(|| Error::NoDatasets(collection.directory().to_path_buf()))?;
    Hdf5Source::open(collection.path_of(first))
}

fn render_series(
    collection: &DatasetCollection,
    fragments: &Fragments,
    count: ParticleCount<'_>,
    out_dir: &Path,
    base_name: &str,
) -> Result<(PathBuf, usize)> {
    let steps = collection
        .files()
        .iter()
        .map(|file| -> Result<Timestep> {
            // Every file is opened, so an unreadable one stops the run.
            let source = Hdf5Source::open(collection.path_of(file))?;
            let npart = match count {
                ParticleCount::Zero => 0,
                ParticleCount::Key(key) => particle_count(key, &source.shape(key)?)?,
                ParticleCount::Attributes(attributes) => {
                    particle_count_for_attributes(&source, attributes)?
                }
            };
            debug!("{}: time {} npart {npart}", file.name, file.timestamp);
            Ok(Timestep::new(file.timestamp, npart, file.name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let document = fragments.render(&steps)?;

    fs::create_dir_all(out_dir)?;
    let path = write_document(out_dir, base_name, &document)?;
    Ok((path, steps.len()))
}
