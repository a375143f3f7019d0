use gdal_sys::GDALDataType;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Complex interferogram sample (re + j·im)
pub type IfgComplex = Complex<f32>;

/// Pixel data types a GDAL band can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelType {
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
    Unknown,
}

impl PixelType {
    /// Map a raw GDAL data type code
    pub fn from_gdal(code: GDALDataType::Type) -> Self {
        match code {
            GDALDataType::GDT_Byte => PixelType::Byte,
            GDALDataType::GDT_UInt16 => PixelType::UInt16,
            GDALDataType::GDT_Int16 => PixelType::Int16,
            GDALDataType::GDT_UInt32 => PixelType::UInt32,
            GDALDataType::GDT_Int32 => PixelType::Int32,
            GDALDataType::GDT_Float32 => PixelType::Float32,
            GDALDataType::GDT_Float64 => PixelType::Float64,
            GDALDataType::GDT_CInt16 => PixelType::CInt16,
            GDALDataType::GDT_CInt32 => PixelType::CInt32,
            GDALDataType::GDT_CFloat32 => PixelType::CFloat32,
            GDALDataType::GDT_CFloat64 => PixelType::CFloat64,
            _ => PixelType::Unknown,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            PixelType::CInt16 | PixelType::CInt32 | PixelType::CFloat32 | PixelType::CFloat64
        )
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelType::Byte => "Byte",
            PixelType::UInt16 => "UInt16",
            PixelType::Int16 => "Int16",
            PixelType::UInt32 => "UInt32",
            PixelType::Int32 => "Int32",
            PixelType::Float32 => "Float32",
            PixelType::Float64 => "Float64",
            PixelType::CInt16 => "CInt16",
            PixelType::CInt32 => "CInt32",
            PixelType::CFloat32 => "CFloat32",
            PixelType::CFloat64 => "CFloat64",
            PixelType::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PixelType {
    type Err = SnaphuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pixel_type = match s.to_ascii_lowercase().as_str() {
            "byte" | "uint8" => PixelType::Byte,
            "uint16" => PixelType::UInt16,
            "int16" => PixelType::Int16,
            "uint32" => PixelType::UInt32,
            "int32" => PixelType::Int32,
            "float32" => PixelType::Float32,
            "float64" => PixelType::Float64,
            "cint16" => PixelType::CInt16,
            "cint32" => PixelType::CInt32,
            "cfloat32" => PixelType::CFloat32,
            "cfloat64" => PixelType::CFloat64,
            other => {
                return Err(SnaphuError::InvalidConfig(format!(
                    "Unknown pixel type: {}",
                    other
                )))
            }
        };
        Ok(pixel_type)
    }
}

/// Affine georeferencing coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn from_gdal(gt: &[f64; 6]) -> Self {
        Self {
            top_left_x: gt[0],
            pixel_width: gt[1],
            rotation_x: gt[2],
            top_left_y: gt[3],
            rotation_y: gt[4],
            pixel_height: gt[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }
}

impl Default for GeoTransform {
    /// GDAL's identity transform
    fn default() -> Self {
        Self::from_gdal(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }
}

/// Metadata of a raster's first band plus its georeferencing
#[derive(Debug, Clone, PartialEq)]
pub struct RasterInfo {
    pub width: usize,
    pub height: usize,
    pub pixel_type: PixelType,
    pub no_data: Option<f64>,
    pub geo_transform: GeoTransform,
    pub projection: String,
}

impl RasterInfo {
    /// Array shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// Error types for conversion, configuration and tool runs
#[derive(Debug, thiserror::Error)]
pub enum SnaphuError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unimplemented pixel type {pixel_type} for {operation}")]
    UnsupportedPixelType {
        pixel_type: PixelType,
        operation: &'static str,
    },

    #[error("Template '{template}' has no value for placeholder '{key}'")]
    MissingPlaceholder { template: String, key: String },

    #[error("Failed to launch {executable}: {source}")]
    ToolLaunch {
        executable: String,
        source: std::io::Error,
    },

    #[error("{executable} exited with {status}\n{log}")]
    ToolFailed {
        executable: String,
        status: String,
        log: String,
    },

    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{} holds {found} bytes, expected {expected}", .path.display())]
    BufferLength {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for bridge operations
pub type SnaphuResult<T> = Result<T, SnaphuError>;
