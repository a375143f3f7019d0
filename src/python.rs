//! Python bindings, built with `--features python`

use crate::core::{binary_to_raster, raster_to_binary, InputFormat, SnaphuConfig, TileParams, UnwrapJob};
use crate::types::{PixelType, SnaphuError};
use pyo3::exceptions::{PyFileNotFoundError, PyKeyError, PyNotImplementedError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: SnaphuError) -> PyErr {
    match err {
        SnaphuError::UnsupportedPixelType { .. } => PyNotImplementedError::new_err(err.to_string()),
        SnaphuError::MissingPlaceholder { .. } => PyKeyError::new_err(err.to_string()),
        SnaphuError::MissingFile(_) => PyFileNotFoundError::new_err(err.to_string()),
        SnaphuError::InvalidConfig(_) | SnaphuError::ShapeMismatch { .. } => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Dump band 1 of a raster to a flat binary file
#[pyfunction]
fn gdal_to_binary(inpath: String, outpath: String, dtype: String) -> PyResult<()> {
    let pixel_type: PixelType = dtype.parse().map_err(to_py_err)?;
    raster_to_binary(&inpath, &outpath, pixel_type).map_err(to_py_err)
}

/// Rebuild a GeoTIFF from a flat binary file, a template and a mask
#[pyfunction]
fn binary_to_gdal(inpath: String, templatepath: String, maskpath: String, outpath: String) -> PyResult<()> {
    binary_to_raster(&inpath, &templatepath, &maskpath, &outpath).map_err(to_py_err)
}

/// Write a SNAPHU config; returns (config path, output path)
#[pyfunction]
#[pyo3(signature = (
    in_ifg,
    in_cor,
    looks_az,
    looks_range,
    shape,
    out_conf,
    out_file,
    tile_shape=None,
    tile_overlap=600,
    in_mask=None,
    unwrapped=false,
    in_format="FLOAT_DATA"
))]
#[allow(clippy::too_many_arguments)]
fn write_snaphu_config(
    in_ifg: String,
    in_cor: String,
    looks_az: u32,
    looks_range: u32,
    shape: (usize, usize),
    out_conf: String,
    out_file: String,
    tile_shape: Option<(usize, usize)>,
    tile_overlap: usize,
    in_mask: Option<String>,
    unwrapped: bool,
    in_format: &str,
) -> PyResult<(String, String)> {
    let format: InputFormat = in_format.parse().map_err(to_py_err)?;
    let mut config = SnaphuConfig::new(&in_ifg, &in_cor, looks_az, looks_range, shape, &out_conf, &out_file)
        .with_unwrapped_input(unwrapped)
        .with_input_format(format);
    if let Some((rows, cols)) = tile_shape {
        config = config.with_tiling(TileParams::new(rows, cols).with_overlap(tile_overlap));
    }
    if let Some(mask) = in_mask {
        config = config.with_mask(mask);
    }

    config.write().map_err(to_py_err)?;
    Ok((out_conf, out_file))
}

/// Run a full job described by a JSON file; returns the output raster path
#[pyfunction]
fn run_unwrap_job(job_path: String) -> PyResult<String> {
    let job = UnwrapJob::from_file(&job_path).map_err(to_py_err)?;
    let output = job.run().map_err(to_py_err)?;
    Ok(output.display().to_string())
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(gdal_to_binary, m)?)?;
    m.add_function(wrap_pyfunction!(binary_to_gdal, m)?)?;
    m.add_function(wrap_pyfunction!(write_snaphu_config, m)?)?;
    m.add_function(wrap_pyfunction!(run_unwrap_job, m)?)?;
    Ok(())
}
