use crate::types::{GeoTransform, IfgComplex, PixelType, RasterInfo, SnaphuError, SnaphuResult};
use gdal::raster::{Buffer, GdalType, RasterBand};
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use std::os::raw::{c_int, c_void};
use std::path::Path;

/// Open a dataset read-only, reporting absent files explicitly
fn open_dataset(path: &Path) -> SnaphuResult<Dataset> {
    if !path.exists() {
        return Err(SnaphuError::MissingFile(path.to_path_buf()));
    }
    Ok(Dataset::open(path)?)
}

/// Raw GDAL data type of a band. The safe `band_type()` collapses complex
/// types to `Unknown`, so the C API is queried directly.
fn band_pixel_type(band: &RasterBand) -> PixelType {
    let code = unsafe { gdal_sys::GDALGetRasterDataType(band.c_rasterband()) };
    PixelType::from_gdal(code)
}

/// Georeferenced raster reader (first band only)
pub struct RasterReader;

impl RasterReader {
    /// Dimensions, band type, nodata and georeferencing of a raster
    pub fn info<P: AsRef<Path>>(path: P) -> SnaphuResult<RasterInfo> {
        let path = path.as_ref();
        let dataset = open_dataset(path)?;
        let (width, height) = dataset.raster_size();
        let band = dataset.rasterband(1)?;

        // Rasters without georeferencing report GDAL's identity transform
        let geo_transform = match dataset.geo_transform() {
            Ok(gt) => GeoTransform::from_gdal(&gt),
            Err(e) => {
                log::debug!("{} has no geotransform ({}), using identity", path.display(), e);
                GeoTransform::default()
            }
        };

        let info = RasterInfo {
            width,
            height,
            pixel_type: band_pixel_type(&band),
            no_data: band.no_data_value(),
            geo_transform,
            projection: dataset.projection(),
        };
        log::debug!(
            "{}: {}x{} {} nodata={:?}",
            path.display(),
            info.width,
            info.height,
            info.pixel_type,
            info.no_data
        );
        Ok(info)
    }

    /// Read band 1 as `T`, letting GDAL convert from the stored type
    pub fn read_band<T: GdalType + Copy, P: AsRef<Path>>(path: P) -> SnaphuResult<Array2<T>> {
        let path = path.as_ref();
        log::info!("Reading raster from: {}", path.display());

        let dataset = open_dataset(path)?;
        let (width, height) = dataset.raster_size();
        let band = dataset.rasterband(1)?;
        let buffer = band.read_as::<T>((0, 0), (width, height), (width, height), None)?;

        Array2::from_shape_vec((height, width), buffer.data().to_vec()).map_err(|_| {
            SnaphuError::ShapeMismatch {
                what: path.display().to_string(),
                expected: (height, width),
                found: (buffer.data().len(), 1),
            }
        })
    }

    /// Read band 1 as 32-bit complex samples
    pub fn read_complex_band<P: AsRef<Path>>(path: P) -> SnaphuResult<Array2<IfgComplex>> {
        let path = path.as_ref();
        log::info!("Reading complex raster from: {}", path.display());

        let dataset = open_dataset(path)?;
        let (width, height) = dataset.raster_size();
        let band = dataset.rasterband(1)?;

        let mut samples = vec![IfgComplex::new(0.0, 0.0); width * height];
        // Complex<f32> is repr(C) {re, im}, matching GDT_CFloat32 in memory
        let err = unsafe {
            gdal_sys::GDALRasterIO(
                band.c_rasterband(),
                gdal_sys::GDALRWFlag::GF_Read,
                0,
                0,
                width as c_int,
                height as c_int,
                samples.as_mut_ptr() as *mut c_void,
                width as c_int,
                height as c_int,
                gdal_sys::GDALDataType::GDT_CFloat32,
                0,
                0,
            )
        };
        if err != gdal_sys::CPLErr::CE_None {
            return Err(SnaphuError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to read complex data from {}", path.display()),
            )));
        }

        Array2::from_shape_vec((height, width), samples).map_err(|_| SnaphuError::ShapeMismatch {
            what: path.display().to_string(),
            expected: (height, width),
            found: (width * height, 1),
        })
    }
}

/// Single-band GeoTIFF writer
pub struct RasterWriter;

impl RasterWriter {
    /// Create `path` as a one-band GeoTIFF holding `data`, georeferenced
    /// with `geo_transform`/`projection`, with band nodata set to `no_data`.
    pub fn write_geotiff<T: GdalType + Copy, P: AsRef<Path>>(
        path: P,
        data: &Array2<T>,
        geo_transform: &GeoTransform,
        projection: &str,
        no_data: Option<f64>,
    ) -> SnaphuResult<()> {
        let path = path.as_ref();
        let (rows, cols) = data.dim();
        log::info!("Writing {}x{} GeoTIFF to {}", rows, cols, path.display());

        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut dataset = driver.create_with_band_type::<T, _>(path, cols, rows, 1)?;
        dataset.set_geo_transform(&geo_transform.to_gdal())?;
        if !projection.is_empty() {
            dataset.set_projection(projection)?;
        }

        let mut band = dataset.rasterband(1)?;
        let samples: Vec<T> = data.iter().copied().collect();
        let mut buffer = Buffer::new((cols, rows), samples);
        band.write((0, 0), (cols, rows), &mut buffer)?;
        band.set_no_data_value(no_data)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_inspect_float_raster() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coh.tif");
        let data = array![[0.1f32, 0.2, 0.3], [0.4, 0.5, 0.6]];
        let gt = GeoTransform::from_gdal(&[100.0, 10.0, 0.0, 200.0, 0.0, -10.0]);

        RasterWriter::write_geotiff(&path, &data, &gt, "", Some(-9999.0)).unwrap();

        let info = RasterReader::info(&path).unwrap();
        assert_eq!(info.shape(), (2, 3));
        assert_eq!(info.pixel_type, PixelType::Float32);
        assert_eq!(info.no_data, Some(-9999.0));
        assert_eq!(info.geo_transform, gt);

        let back: Array2<f32> = RasterReader::read_band(&path).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_byte_raster_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mask.tif");
        let data = array![[0u8, 1], [1, 1]];

        RasterWriter::write_geotiff(&path, &data, &GeoTransform::default(), "", None).unwrap();

        let info = RasterReader::info(&path).unwrap();
        assert_eq!(info.pixel_type, PixelType::Byte);
        assert_eq!(info.no_data, None);
    }

    #[test]
    fn test_missing_raster() {
        let result = RasterReader::info("/nonexistent/dir/none.tif");
        assert!(matches!(result, Err(SnaphuError::MissingFile(_))));
    }
}
