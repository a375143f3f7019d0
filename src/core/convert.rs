use crate::io::{FlatBinary, RasterReader, RasterWriter};
use crate::types::{IfgComplex, PixelType, SnaphuError, SnaphuResult};
use ndarray::{Array2, Zip};
use std::f32::consts::PI;
use std::path::Path;

/// Phase angle of every complex sample, in (-π, π]
pub fn wrapped_phase(ifg: &Array2<IfgComplex>) -> Array2<f32> {
    ifg.mapv(|z| {
        let phase = z.arg();
        // atan2 yields -π on the negative real axis with a -0.0 imaginary part
        if phase == -PI {
            PI
        } else {
            phase
        }
    })
}

/// Overwrite every sample whose mask value is 0 with `fill`.
///
/// Returns the number of samples replaced.
pub fn apply_mask<T: Copy>(data: &mut Array2<T>, mask: &Array2<u8>, fill: T) -> SnaphuResult<usize> {
    if data.dim() != mask.dim() {
        return Err(SnaphuError::ShapeMismatch {
            what: "mask".to_string(),
            expected: data.dim(),
            found: mask.dim(),
        });
    }

    let mut masked = 0usize;
    Zip::from(data).and(mask).for_each(|value, &m| {
        if m == 0 {
            *value = fill;
            masked += 1;
        }
    });
    Ok(masked)
}

/// Dump band 1 of `raster` to a flat binary file as `pixel_type`.
///
/// `Float32` and `Byte` are written unchanged; `CFloat32` is reduced to its
/// phase angle and written as 32-bit float. Anything else is rejected before
/// any file is touched.
pub fn raster_to_binary<P: AsRef<Path>, Q: AsRef<Path>>(
    raster: P,
    binary: Q,
    pixel_type: PixelType,
) -> SnaphuResult<()> {
    let (raster, binary) = (raster.as_ref(), binary.as_ref());
    log::info!(
        "Converting {} ({}) to flat binary {}",
        raster.display(),
        pixel_type,
        binary.display()
    );

    match pixel_type {
        PixelType::Float32 => {
            let data: Array2<f32> = RasterReader::read_band(raster)?;
            FlatBinary::write(binary, &data)
        }
        PixelType::Byte => {
            let data: Array2<u8> = RasterReader::read_band(raster)?;
            FlatBinary::write(binary, &data)
        }
        PixelType::CFloat32 => {
            let ifg = RasterReader::read_complex_band(raster)?;
            FlatBinary::write(binary, &wrapped_phase(&ifg))
        }
        other => Err(SnaphuError::UnsupportedPixelType {
            pixel_type: other,
            operation: "raster to binary conversion",
        }),
    }
}

/// Rebuild a GeoTIFF from a flat binary file.
///
/// Shape, pixel type, georeferencing and nodata come from `template`; every
/// pixel where band 1 of `mask` is 0 is set to the template's nodata value.
pub fn binary_to_raster<P, Q, R, S>(binary: P, template: Q, mask: R, output: S) -> SnaphuResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
    S: AsRef<Path>,
{
    let (binary, template, mask, output) =
        (binary.as_ref(), template.as_ref(), mask.as_ref(), output.as_ref());
    log::info!(
        "Converting {} to {} using template {}",
        binary.display(),
        output.display(),
        template.display()
    );

    let info = RasterReader::info(template)?;
    if !matches!(info.pixel_type, PixelType::Float32 | PixelType::Byte) {
        return Err(SnaphuError::UnsupportedPixelType {
            pixel_type: info.pixel_type,
            operation: "binary to raster conversion",
        });
    }

    let mask_data: Array2<u8> = RasterReader::read_band(mask)?;
    if mask_data.dim() != info.shape() {
        return Err(SnaphuError::ShapeMismatch {
            what: format!("mask {}", mask.display()),
            expected: info.shape(),
            found: mask_data.dim(),
        });
    }

    match info.pixel_type {
        PixelType::Float32 => {
            let mut data: Array2<f32> = FlatBinary::read(binary, info.shape())?;
            let fill = info.no_data.map(|v| v as f32).unwrap_or(f32::NAN);
            let masked = apply_mask(&mut data, &mask_data, fill)?;
            log::info!("Masked {} of {} pixels", masked, data.len());
            RasterWriter::write_geotiff(
                output,
                &data,
                &info.geo_transform,
                &info.projection,
                info.no_data,
            )
        }
        PixelType::Byte => {
            let fill = info.no_data.ok_or_else(|| {
                SnaphuError::InvalidConfig(format!(
                    "Byte template {} defines no nodata value to fill masked pixels",
                    template.display()
                ))
            })?;
            let mut data: Array2<u8> = FlatBinary::read(binary, info.shape())?;
            let masked = apply_mask(&mut data, &mask_data, fill as u8)?;
            log::info!("Masked {} of {} pixels", masked, data.len());
            RasterWriter::write_geotiff(
                output,
                &data,
                &info.geo_transform,
                &info.projection,
                info.no_data,
            )
        }
        other => Err(SnaphuError::UnsupportedPixelType {
            pixel_type: other,
            operation: "binary to raster conversion",
        }),
    }
}
