//! Generation requests.
//!
//! A request is built once (from command-line flags or a JSON file) and then
//! passed by reference through every stage of the pipeline.

use crate::template::find_placeholder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Kind of data stored in the series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Scattered particles with per-file coordinate arrays.
    Particles,
    /// Values on a static co-rectilinear grid.
    Fields,
}

/// Dataset keys bound to the spatial axes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub z: Option<String>,
}

impl AxisSelection {
    /// Creates an axis selection. An empty `z` means no Z axis.
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: Option<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z,
        }
    }

    /// Key of the Z axis, if one was selected.
    #[must_use]
    pub fn z_key(&self) -> Option<&str> {
        self.z.as_deref().filter(|z| !z.is_empty())
    }

    /// True when no Z axis was selected (2D data).
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.z_key().is_none()
    }

    fn validate(&self) -> Result<()> {
        if self.x.is_empty() || self.y.is_empty() {
            return Err(Error::InvalidRequest(
                "X and Y axis keys are required".to_string(),
            ));
        }
        validate_key(&self.x)?;
        validate_key(&self.y)?;
        if let Some(z) = self.z_key() {
            validate_key(z)?;
        }
        Ok(())
    }
}

fn default_write_parts() -> bool {
    true
}

/// Parameters for generating fresh fragments and the XDMF document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: DatasetKind,
    /// Directory holding the `.h5` series.
    pub directory: PathBuf,
    /// Base name of the written `.xdmf` and fragment files.
    pub base_name: String,
    pub axes: AxisSelection,
    /// Attribute dataset keys, in output order.
    pub attributes: Vec<String>,
    /// Dataset whose shape gives the particle count. Defaults to the first
    /// attribute.
    #[serde(default)]
    pub count_key: Option<String>,
    /// Where outputs go. Defaults to `directory`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_write_parts")]
    pub write_parts: bool,
}

impl GenerationRequest {
    /// Load a request from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let request: Self = serde_json::from_reader(reader)?;
        request.validate()?;
        Ok(request)
    }

    /// Load a request from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Check the request invariants.
    ///
    /// # Errors
    /// Returns an error if no attribute is selected, an attribute repeats,
    /// the base name is unusable, an X/Y axis key is missing, or a name
    /// contains a template placeholder.
    pub fn validate(&self) -> Result<()> {
        validate_base_name(&self.base_name)?;
        self.axes.validate()?;

        if self.attributes.is_empty() {
            return Err(Error::NoAttributes);
        }
        let mut seen = HashSet::with_capacity(self.attributes.len());
        for key in &self.attributes {
            if key.is_empty() {
                return Err(Error::InvalidRequest("empty attribute key".to_string()));
            }
            validate_key(key)?;
            if !seen.insert(key.as_str()) {
                return Err(Error::DuplicateAttribute(key.clone()));
            }
        }
        if let Some(key) = self.count_key() {
            validate_key(key)?;
        }
        Ok(())
    }

    /// Directory the outputs are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.directory)
    }

    /// Key whose shape yields the particle count, when one was given.
    #[must_use]
    pub fn count_key(&self) -> Option<&str> {
        self.count_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Parameters for re-rendering previously saved fragments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub kind: DatasetKind,
    pub directory: PathBuf,
    pub base_name: String,
    pub header: PathBuf,
    pub body: PathBuf,
    pub footer: PathBuf,
    /// Required for particle series.
    #[serde(default)]
    pub count_key: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl LoadRequest {
    /// Load a request from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let request: Self = serde_json::from_reader(BufReader::new(file))?;
        request.validate()?;
        Ok(request)
    }

    /// Load a request from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Check the request invariants.
    ///
    /// # Errors
    /// Returns an error if the base name is unusable or a particle series
    /// has no usable count key.
    pub fn validate(&self) -> Result<()> {
        validate_base_name(&self.base_name)?;
        match self.count_key() {
            Some(key) => validate_key(key)?,
            None if self.kind == DatasetKind::Particles => {
                return Err(Error::InvalidRequest(
                    "particle series need a count key to reload fragments".to_string(),
                ));
            }
            None => {}
        }
        Ok(())
    }

    /// Directory the outputs are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.directory)
    }

    /// Key whose shape yields the particle count, when one was given.
    #[must_use]
    pub fn count_key(&self) -> Option<&str> {
        self.count_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn validate_base_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRequest("base name is empty".to_string()));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::InvalidRequest(format!(
            "base name must not contain path separators: {name}"
        )));
    }
    if let Some(token) = find_placeholder(name) {
        return Err(Error::InvalidRequest(format!(
            "base name {name} contains placeholder {token}"
        )));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    match find_placeholder(key) {
        Some(token) => Err(Error::InvalidRequest(format!(
            "dataset key {key} contains placeholder {token}"
        ))),
        None => Ok(()),
    }
}
