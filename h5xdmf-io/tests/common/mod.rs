//! HDF5 fixture files for the pipeline tests.
#![allow(dead_code)]

use hdf5::File;
use ndarray::{Array1, Array2, Array3};
use std::path::Path;

/// Writes a 2D field file: `grid/x` (4 nodes over 0..=3), `grid/y`
/// (3 nodes over 0..=3) and `data/rho`, `data/u` of shape (3, 4).
pub fn write_field_file(path: &Path) {
    let file = File::create(path).unwrap();
    let grid = file.create_group("grid").unwrap();
    write_1d(&grid, "x", &[0.0, 1.0, 2.0, 3.0]);
    write_1d(&grid, "y", &[0.0, 1.5, 3.0]);

    let data = file.create_group("data").unwrap();
    for name in ["rho", "u"] {
        let values = Array2::<f64>::from_shape_fn((3, 4), |(j, i)| (j * 4 + i) as f64);
        data.new_dataset::<f64>()
            .shape((3, 4))
            .create(name)
            .unwrap()
            .write(&values)
            .unwrap();
    }
}

/// Writes a 3D field file: `grid/x` (4 nodes over 0..=3), `grid/y`
/// (3 nodes over 0..=3), `grid/z` (2 nodes over 0..=4) and `data/rho` of
/// shape (2, 3, 4).
pub fn write_volume_file(path: &Path) {
    let file = File::create(path).unwrap();
    let grid = file.create_group("grid").unwrap();
    write_1d(&grid, "x", &[0.0, 1.0, 2.0, 3.0]);
    write_1d(&grid, "y", &[0.0, 1.5, 3.0]);
    write_1d(&grid, "z", &[0.0, 4.0]);

    let values = Array3::<f64>::from_shape_fn((2, 3, 4), |(k, j, i)| (k * 12 + j * 4 + i) as f64);
    file.create_group("data")
        .unwrap()
        .new_dataset::<f64>()
        .shape((2, 3, 4))
        .create("rho")
        .unwrap()
        .write(&values)
        .unwrap();
}

/// Writes a particle file like [`write_particle_file`] plus `particles/pos`,
/// the coordinates stored row-wise with shape (3, `count`).
pub fn write_particle_rows_file(path: &Path, count: usize) {
    write_particle_file(path, count);
    let file = File::append(path).unwrap();
    let positions = Array2::<f64>::from_shape_fn((3, count), |(axis, i)| (axis * count + i) as f64);
    file.group("particles")
        .unwrap()
        .new_dataset::<f64>()
        .shape((3, count))
        .create("pos")
        .unwrap()
        .write(&positions)
        .unwrap();
}

/// Writes a particle file with `count` particles under `particles/`.
pub fn write_particle_file(path: &Path, count: usize) {
    let file = File::create(path).unwrap();
    let group = file.create_group("particles").unwrap();
    for name in ["x", "y", "z", "mass"] {
        let values: Vec<f64> = (0..count).map(|i| i as f64).collect();
        write_1d(&group, name, &values);
    }
}

fn write_1d(group: &hdf5::Group, name: &str, values: &[f64]) {
    group
        .new_dataset::<f64>()
        .shape((values.len(),))
        .create(name)
        .unwrap()
        .write(&Array1::from(values.to_vec()))
        .unwrap();
}
