#![allow(dead_code)]

use ndarray::Array2;
use snaphu_bridge::{GeoTransform, IfgComplex, RasterWriter};
use std::ffi::CString;
use std::os::raw::{c_int, c_void};
use std::path::Path;

pub const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;

pub fn test_transform() -> GeoTransform {
    GeoTransform::from_gdal(&[-120.5, 0.001, 0.0, 36.25, 0.0, -0.001])
}

/// Deterministic, non-trivial float test pattern
pub fn float_pattern(rows: usize, cols: usize) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |(i, j)| (i as f32 * 0.75) - (j as f32 * 0.125) + 0.5)
}

pub fn write_float(path: &Path, data: &Array2<f32>, no_data: Option<f64>) {
    RasterWriter::write_geotiff(path, data, &test_transform(), WGS84_WKT, no_data)
        .expect("Failed to write float raster");
}

pub fn write_byte(path: &Path, data: &Array2<u8>, no_data: Option<f64>) {
    RasterWriter::write_geotiff(path, data, &test_transform(), WGS84_WKT, no_data)
        .expect("Failed to write byte raster");
}

/// GDAL's safe API has no complex sample type, so CFloat32 fixtures go
/// through the C API
pub fn write_complex(path: &Path, data: &Array2<IfgComplex>) {
    let (rows, cols) = data.dim();
    let mut samples: Vec<IfgComplex> = data.iter().copied().collect();
    let driver_name = CString::new("GTiff").unwrap();
    let c_path = CString::new(path.to_str().unwrap()).unwrap();

    unsafe {
        gdal_sys::GDALAllRegister();
        let driver = gdal_sys::GDALGetDriverByName(driver_name.as_ptr());
        assert!(!driver.is_null(), "GTiff driver not available");

        let dataset = gdal_sys::GDALCreate(
            driver,
            c_path.as_ptr(),
            cols as c_int,
            rows as c_int,
            1,
            gdal_sys::GDALDataType::GDT_CFloat32,
            std::ptr::null_mut(),
        );
        assert!(!dataset.is_null(), "Failed to create complex raster");

        let band = gdal_sys::GDALGetRasterBand(dataset, 1);
        let err = gdal_sys::GDALRasterIO(
            band,
            gdal_sys::GDALRWFlag::GF_Write,
            0,
            0,
            cols as c_int,
            rows as c_int,
            samples.as_mut_ptr() as *mut c_void,
            cols as c_int,
            rows as c_int,
            gdal_sys::GDALDataType::GDT_CFloat32,
            0,
            0,
        );
        assert_eq!(err, gdal_sys::CPLErr::CE_None, "Failed to write complex samples");

        gdal_sys::GDALClose(dataset);
    }
}
