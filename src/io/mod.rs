//! I/O modules for GDAL rasters and SNAPHU's flat binary files

pub mod binary;
pub mod raster;

pub use binary::{FlatBinary, FlatElement};
pub use raster::{RasterReader, RasterWriter};
