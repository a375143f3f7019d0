//! snaphu-bridge: GDAL rasters in, SNAPHU phase unwrapping, GDAL rasters out
//!
//! This library converts georeferenced rasters into the headerless binary
//! files SNAPHU reads, writes SNAPHU configuration files, runs the unwrapper
//! and turns its output back into a georeferenced, masked raster.

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use crate::types::{GeoTransform, IfgComplex, PixelType, RasterInfo, SnaphuError, SnaphuResult};

pub use crate::io::{FlatBinary, RasterReader, RasterWriter};
pub use crate::core::{
    binary_to_raster, raster_to_binary, InputFormat, RasterInput, RasterRole, SnaphuConfig,
    SnaphuRunner, TileParams, UnwrapJob,
};
