//! Grid geometry and particle counts derived from dataset extents.
//!
//! Field series are assumed to live on a static grid: the geometry is read
//! from one file and reused for every timestep.

use crate::request::AxisSelection;
use crate::source::DatasetSource;
use crate::{Error, Result};
use log::warn;

/// Number of grid nodes along each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Dimensions {
    /// Sentinel used when selected attributes disagree on their shape.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Builds dimensions from an attribute shape.
    ///
    /// A 3D shape `(s0, s1, s2)` maps to `z = s0, y = s1, x = s2`. A 2D
    /// shape is promoted by inserting a leading dimension of 1.
    ///
    /// # Errors
    /// Returns [`Error::InvalidShape`] for ranks other than 2 or 3.
    pub fn from_shape(key: &str, shape: &[usize]) -> Result<Self> {
        match *shape {
            [y, x] => Ok(Self { x, y, z: 1 }),
            [z, y, x] => Ok(Self { x, y, z }),
            _ => Err(Error::InvalidShape {
                key: key.to_string(),
                shape: shape.to_vec(),
            }),
        }
    }
}

/// Physical distance between neighbouring grid nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Coordinates of the lower-left grid node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Geometry descriptor of a static field grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub dimensions: Dimensions,
    pub spacing: Spacing,
    pub origin: Origin,
    /// No Z axis selected.
    pub planar: bool,
}

/// Rounds to 4 decimal places.
#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Minimum and maximum of an axis coordinate array.
///
/// # Errors
/// Returns [`Error::EmptyAxis`] if `values` is empty.
pub fn axis_bounds(key: &str, values: &[f64]) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(Error::EmptyAxis(key.to_string()));
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok((min, max))
}

/// Spacing of `count` nodes spread over `[min, max]`, rounded to 4 places.
///
/// A zero count (degenerate dimensions) yields `0` rather than infinity.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn axis_spacing(min: f64, max: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round4((max - min) / count as f64)
}

/// Particle count from the shape of a per-particle dataset.
///
/// The first dimension is used, unless the array is 2D and its second
/// dimension exceeds the first.
///
/// # Errors
/// Returns [`Error::InvalidShape`] for scalar datasets.
pub fn particle_count(key: &str, shape: &[usize]) -> Result<usize> {
    match *shape {
        [] => Err(Error::InvalidShape {
            key: key.to_string(),
            shape: Vec::new(),
        }),
        [rows, cols] if cols > rows => Ok(cols),
        [first, ..] => Ok(first),
    }
}

/// Grid dimensions shared by all selected attributes.
///
/// Disagreeing shapes are logged and produce [`Dimensions::ZERO`].
///
/// # Errors
/// Returns an error if a shape cannot be read, no attribute is given, or
/// the common shape is not 2D/3D.
pub fn attribute_dimensions<S: DatasetSource>(
    source: &S,
    attributes: &[String],
) -> std::result::Result<Dimensions, S::Error> {
    let Some((first_key, rest)) = attributes.split_first() else {
        return Err(Error::NoAttributes.into());
    };
    let first_shape = source.shape(first_key)?;

    for key in rest {
        let shape = source.shape(key)?;
        if shape != first_shape {
            warn!(
                "Selected attributes have different dimensions: {first_key} {first_shape:?}, {key} {shape:?}"
            );
            return Ok(Dimensions::ZERO);
        }
    }

    Ok(Dimensions::from_shape(first_key, &first_shape)?)
}

/// Computes the static grid geometry of a field series from one file.
///
/// # Errors
/// Returns an error if an attribute or axis dataset cannot be read, an axis
/// is empty, or the attribute shape is unsupported.
pub fn field_geometry<S: DatasetSource>(
    source: &S,
    axes: &AxisSelection,
    attributes: &[String],
) -> std::result::Result<GridGeometry, S::Error> {
    let dimensions = attribute_dimensions(source, attributes)?;

    let (x_min, x_max) = read_bounds(source, &axes.x)?;
    let (y_min, y_max) = read_bounds(source, &axes.y)?;
    let (z_origin, z_spacing) = match axes.z_key() {
        Some(key) => {
            let (z_min, z_max) = read_bounds(source, key)?;
            (z_min, axis_spacing(z_min, z_max, dimensions.z))
        }
        None => (0.0, 1.0),
    };

    Ok(GridGeometry {
        dimensions,
        spacing: Spacing {
            x: axis_spacing(x_min, x_max, dimensions.x),
            y: axis_spacing(y_min, y_max, dimensions.y),
            z: z_spacing,
        },
        origin: Origin {
            x: x_min,
            y: y_min,
            z: z_origin,
        },
        planar: axes.is_planar(),
    })
}

/// Particle count of one file, taken from the first selected attribute.
///
/// Attributes with a different shape are logged; the first shape wins.
///
/// # Errors
/// Returns an error if a shape cannot be read or no attribute is given.
pub fn particle_count_for_attributes<S: DatasetSource>(
    source: &S,
    attributes: &[String],
) -> std::result::Result<usize, S::Error> {
    let Some((first_key, rest)) = attributes.split_first() else {
        return Err(Error::NoAttributes.into());
    };
    let first_shape = source.shape(first_key)?;

    for key in rest {
        let shape = source.shape(key)?;
        if shape != first_shape {
            warn!(
                "Selected attributes have different particle count: {first_key} {first_shape:?}, {key} {shape:?}"
            );
        }
    }

    Ok(particle_count(first_key, &first_shape)?)
}

fn read_bounds<S: DatasetSource>(
    source: &S,
    key: &str,
) -> std::result::Result<(f64, f64), S::Error> {
    let values = source.read_values(key)?;
    Ok(axis_bounds(key, &values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySource {
        datasets: HashMap<String, (Vec<usize>, Vec<f64>)>,
    }

    impl MemorySource {
        fn with(mut self, key: &str, shape: &[usize], values: &[f64]) -> Self {
            self.datasets
                .insert(key.to_string(), (shape.to_vec(), values.to_vec()));
            self
        }
    }

    impl DatasetSource for MemorySource {
        type Error = Error;

        fn shape(&self, key: &str) -> Result<Vec<usize>> {
            self.datasets
                .get(key)
                .map(|(shape, _)| shape.clone())
                .ok_or_else(|| Error::InvalidRequest(format!("missing {key}")))
        }

        fn read_values(&self, key: &str) -> Result<Vec<f64>> {
            self.datasets
                .get(key)
                .map(|(_, values)| values.clone())
                .ok_or_else(|| Error::InvalidRequest(format!("missing {key}")))
        }
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_axis_spacing_and_origin() {
        let (min, max) = axis_bounds("x", &[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(min, 0.0);
        assert_relative_eq!(axis_spacing(min, max, 4), 0.75);
    }

    #[test]
    fn test_spacing_rounded_to_four_places() {
        assert_relative_eq!(axis_spacing(0.0, 1.0, 3), 0.3333);
        assert_relative_eq!(axis_spacing(0.0, 2.0, 3), 0.6667);
    }

    #[test]
    fn test_zero_count_spacing() {
        assert_relative_eq!(axis_spacing(0.0, 5.0, 0), 0.0);
    }

    #[test]
    fn test_empty_axis_rejected() {
        assert!(matches!(axis_bounds("x", &[]), Err(Error::EmptyAxis(_))));
    }

    #[test]
    fn test_dimensions_promote_2d() {
        let dims = Dimensions::from_shape("rho", &[20, 30]).unwrap();
        assert_eq!(dims, Dimensions { x: 30, y: 20, z: 1 });
        let dims = Dimensions::from_shape("rho", &[4, 20, 30]).unwrap();
        assert_eq!(dims, Dimensions { x: 30, y: 20, z: 4 });
        assert!(Dimensions::from_shape("rho", &[5]).is_err());
    }

    #[test]
    fn test_particle_count() {
        assert_eq!(particle_count("p", &[100, 3]).unwrap(), 100);
        assert_eq!(particle_count("p", &[3, 500]).unwrap(), 500);
        assert_eq!(particle_count("p", &[64]).unwrap(), 64);
        assert_eq!(particle_count("p", &[2, 7, 9]).unwrap(), 2);
        assert!(particle_count("p", &[]).is_err());
    }

    #[test]
    fn test_field_geometry_3d() {
        let source = MemorySource::default()
            .with("rho", &[2, 3, 4], &[])
            .with("u", &[2, 3, 4], &[])
            .with("x", &[4], &[0.0, 1.0, 2.0, 3.0])
            .with("y", &[3], &[-1.5, 0.0, 1.5])
            .with("z", &[2], &[10.0, 12.0]);
        let axes = AxisSelection::new("x", "y", Some("z".to_string()));

        let geometry = field_geometry(&source, &axes, &keys(&["rho", "u"])).unwrap();
        assert_eq!(geometry.dimensions, Dimensions { x: 4, y: 3, z: 2 });
        assert_relative_eq!(geometry.spacing.x, 0.75);
        assert_relative_eq!(geometry.spacing.y, 1.0);
        assert_relative_eq!(geometry.spacing.z, 1.0);
        assert_relative_eq!(geometry.origin.y, -1.5);
        assert_relative_eq!(geometry.origin.z, 10.0);
        assert!(!geometry.planar);
    }

    #[test]
    fn test_field_geometry_planar_defaults() {
        let source = MemorySource::default()
            .with("rho", &[2, 4], &[])
            .with("x", &[4], &[0.0, 1.0, 2.0, 3.0])
            .with("y", &[2], &[0.0, 1.0]);
        let axes = AxisSelection::new("x", "y", None);

        let geometry = field_geometry(&source, &axes, &keys(&["rho"])).unwrap();
        assert_eq!(geometry.dimensions, Dimensions { x: 4, y: 2, z: 1 });
        assert_relative_eq!(geometry.spacing.z, 1.0);
        assert_relative_eq!(geometry.origin.z, 0.0);
        assert!(geometry.planar);
    }

    #[test]
    fn test_mismatched_attributes_zero_dimensions() {
        let source = MemorySource::default()
            .with("rho", &[2, 4], &[])
            .with("u", &[3, 4], &[])
            .with("x", &[4], &[0.0, 3.0])
            .with("y", &[2], &[0.0, 1.0]);
        let axes = AxisSelection::new("x", "y", None);

        let geometry = field_geometry(&source, &axes, &keys(&["rho", "u"])).unwrap();
        assert_eq!(geometry.dimensions, Dimensions::ZERO);
        assert_relative_eq!(geometry.spacing.x, 0.0);
    }

    #[test]
    fn test_particle_count_for_attributes_first_wins() {
        let source = MemorySource::default()
            .with("mass", &[250], &[])
            .with("charge", &[100], &[]);
        let count = particle_count_for_attributes(&source, &keys(&["mass", "charge"])).unwrap();
        assert_eq!(count, 250);
        assert!(matches!(
            particle_count_for_attributes(&source, &[]),
            Err(Error::NoAttributes)
        ));
    }
}
