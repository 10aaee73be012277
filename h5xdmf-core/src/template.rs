//! XDMF fragment templates and per-timestep rendering.
//!
//! A document is a header, one body copy per file of the series, and a
//! footer. The body carries placeholders that are substituted per file:
//!
//! - `%TIME%`: timestamp extracted from the filename
//! - `%NPART%`: particle count of the file (0 for fields)
//! - `%FILE%`: the filename, used as HDF5 data pointer prefix

use crate::geometry::GridGeometry;
use crate::request::AxisSelection;
use crate::{Error, Result};
use quick_xml::escape::escape;

pub const TIME_PLACEHOLDER: &str = "%TIME%";
pub const NPART_PLACEHOLDER: &str = "%NPART%";
pub const FILE_PLACEHOLDER: &str = "%FILE%";

const PLACEHOLDERS: [&str; 3] = [TIME_PLACEHOLDER, NPART_PLACEHOLDER, FILE_PLACEHOLDER];

const XDMF_PROLOGUE: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE Xdmf SYSTEM "Xdmf.dtd" ["#;

const XDMF_OPEN: &str = r#"]>
<Xdmf Version="2.0">
<Domain>
<Grid Name="Time" GridType="Collection" CollectionType="Temporal">
"#;

const XDMF_FOOTER: &str = "</Grid>\n</Domain>\n</Xdmf>\n";

/// Values substituted into one body copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timestep {
    pub time: u64,
    pub npart: usize,
    pub file: String,
}

impl Timestep {
    pub fn new(time: u64, npart: usize, file: impl Into<String>) -> Self {
        Self {
            time,
            npart,
            file: file.into(),
        }
    }
}

/// Header, per-timestep body and footer of an XDMF document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragments {
    pub header: String,
    pub body: String,
    pub footer: String,
}

impl Fragments {
    /// Renders the body for one timestep.
    ///
    /// # Errors
    /// Returns [`Error::PlaceholderCollision`] if the filename contains a
    /// placeholder token.
    pub fn render_step(&self, step: &Timestep) -> Result<String> {
        check_filename(&step.file)?;
        Ok(self
            .body
            .replace(TIME_PLACEHOLDER, &step.time.to_string())
            .replace(NPART_PLACEHOLDER, &step.npart.to_string())
            .replace(FILE_PLACEHOLDER, &escape(step.file.as_str())))
    }

    /// Renders the full document: header, one body per step, footer.
    ///
    /// # Errors
    /// Returns an error if any step's filename collides with a placeholder.
    pub fn render<'a, I>(&self, steps: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a Timestep>,
    {
        let mut document = self.header.clone();
        for step in steps {
            document.push_str(&self.render_step(step)?);
        }
        document.push_str(&self.footer);
        Ok(document)
    }
}

/// Rejects filenames that would be mistaken for a placeholder.
///
/// # Errors
/// Returns [`Error::PlaceholderCollision`] naming the first token found.
pub fn check_filename(filename: &str) -> Result<()> {
    match find_placeholder(filename) {
        Some(token) => Err(Error::PlaceholderCollision {
            filename: filename.to_string(),
            token,
        }),
        None => Ok(()),
    }
}

/// First placeholder token contained in `text`, if any.
#[must_use]
pub fn find_placeholder(text: &str) -> Option<&'static str> {
    PLACEHOLDERS.iter().copied().find(|token| text.contains(token))
}

/// Builds the fragments of a field series on a static grid.
#[must_use]
pub fn field_fragments(
    name: &str,
    axes: &AxisSelection,
    attributes: &[String],
    geometry: &GridGeometry,
) -> Fragments {
    let entity = if axes.is_planar() { "cYX" } else { "cZYX" };
    let dims = geometry.dimensions;
    let spacing = geometry.spacing;
    let origin = geometry.origin;

    let header = format!(
        "{XDMF_PROLOGUE}\n  <!ENTITY {entity} \"{} {} {}\">\n  <!ENTITY cDX \"{} {} {}\">\n{XDMF_OPEN}",
        dims.z, dims.y, dims.x, spacing.z, spacing.y, spacing.x
    );

    let mut body = format!(
        r#"  <Grid Name="{name}">
    <Time Value="{TIME_PLACEHOLDER}" />
    <Topology TopologyType="3DCoRectMesh" Dimensions="&{entity};"/>
    <Geometry GeometryType="ORIGIN_DXDYDZ">
      <DataItem Format="XML" Dimensions="3">
        {} {} {}
      </DataItem>
      <DataItem Format="XML" Dimensions="3">&cDX;</DataItem>
    </Geometry>
"#,
        origin.z,
        origin.y,
        origin.x,
        name = escape(name),
    );

    for key in attributes {
        let key = escape(key.as_str());
        body.push_str(&format!(
            r#"    <Attribute Name="{key}" Center="Node" AttributeType="Scalar">
      <DataItem ItemType="Uniform" Format="HDF" NumberType="Float" Precision="8" Dimensions="&{entity};">{FILE_PLACEHOLDER}:{key}</DataItem>
    </Attribute>
"#
        ));
    }
    body.push_str("  </Grid>\n");

    Fragments {
        header,
        body,
        footer: XDMF_FOOTER.to_string(),
    }
}

/// Builds the fragments of a particle series.
///
/// Particle headers declare no entities; sizes come from `%NPART%`.
#[must_use]
pub fn particle_fragments(name: &str, axes: &AxisSelection, attributes: &[String]) -> Fragments {
    let header = format!("{XDMF_PROLOGUE}\n{XDMF_OPEN}");

    let mut body = format!(
        r#"  <Grid Name="{name}">
    <Time Value="{TIME_PLACEHOLDER}" />
    <Topology TopologyType="Polyvertex" NumberOfElements="{NPART_PLACEHOLDER}" NodesPerElement="1" />
"#,
        name = escape(name),
    );

    let mut coordinates = vec![("X", axes.x.as_str()), ("Y", axes.y.as_str())];
    if let Some(z) = axes.z_key() {
        coordinates.push(("Z", z));
    }
    let geometry_type = if axes.is_planar() { "X_Y" } else { "X_Y_Z" };

    body.push_str(&format!(
        "    <Geometry GeometryType=\"{geometry_type}\">\n"
    ));
    for (axis, key) in coordinates {
        body.push_str(&format!(
            r#"      <DataItem Name="{axis}" ItemType="Uniform" DataType="Float" Precision="4" Dimensions="{NPART_PLACEHOLDER} 1" Format="HDF">
        {FILE_PLACEHOLDER}:{key}
      </DataItem>
"#,
            key = escape(key),
        ));
    }
    body.push_str("    </Geometry>\n");

    for key in attributes {
        let key = escape(key.as_str());
        body.push_str(&format!(
            r#"    <Attribute Name="{key}" AttributeType="Scalar" Center="Node">
      <DataItem ItemType="Uniform" DataType="Float" Precision="4" Dimensions="{NPART_PLACEHOLDER}" Format="HDF">
        {FILE_PLACEHOLDER}:{key}
      </DataItem>
    </Attribute>
"#
        ));
    }
    body.push_str("  </Grid>\n");

    Fragments {
        header,
        body,
        footer: XDMF_FOOTER.to_string(),
    }
}
