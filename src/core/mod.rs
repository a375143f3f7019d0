//! Conversion, configuration and SNAPHU driver modules

pub mod convert;
pub mod pipeline;
pub mod runner;
pub mod snaphu_config;

// Re-export main types
pub use convert::{apply_mask, binary_to_raster, raster_to_binary, wrapped_phase};
pub use pipeline::{RasterInput, RasterRole, UnwrapJob};
pub use runner::SnaphuRunner;
pub use snaphu_config::{InputFormat, SnaphuConfig, Template, TileParams, DEFAULT_TILE_OVERLAP};
