use crate::types::{SnaphuError, SnaphuResult};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Fixed-size sample that can live in a headerless flat binary file.
///
/// Samples are stored in native byte order, the same layout SNAPHU reads
/// and writes on the host it runs on.
pub trait FlatElement: Copy {
    type Bytes: AsRef<[u8]>;

    /// Size of one sample in bytes
    const SIZE: usize;

    fn to_bytes(self) -> Self::Bytes;

    /// Decode one sample; `bytes` is exactly `SIZE` long
    fn from_bytes(bytes: &[u8]) -> Self;
}

impl FlatElement for f32 {
    type Bytes = [u8; 4];
    const SIZE: usize = 4;

    fn to_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        f32::from_ne_bytes(buf)
    }
}

impl FlatElement for u8 {
    type Bytes = [u8; 1];
    const SIZE: usize = 1;

    fn to_bytes(self) -> Self::Bytes {
        [self]
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl FlatElement for i8 {
    type Bytes = [u8; 1];
    const SIZE: usize = 1;

    fn to_bytes(self) -> Self::Bytes {
        self.to_ne_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        i8::from_ne_bytes([bytes[0]])
    }
}

/// Row-major, headerless binary files
pub struct FlatBinary;

impl FlatBinary {
    /// Write `data` row by row, overwriting `path`
    pub fn write<T: FlatElement, P: AsRef<Path>>(path: P, data: &Array2<T>) -> SnaphuResult<()> {
        let path = path.as_ref();
        let (rows, cols) = data.dim();
        log::debug!(
            "Writing {}x{} flat binary ({} bytes/sample) to {}",
            rows,
            cols,
            T::SIZE,
            path.display()
        );

        let mut writer = BufWriter::new(File::create(path)?);
        // iter() walks in logical row-major order whatever the memory layout
        for value in data.iter() {
            writer.write_all(value.to_bytes().as_ref())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a flat binary file of known `(rows, cols)` shape
    pub fn read<T: FlatElement, P: AsRef<Path>>(
        path: P,
        shape: (usize, usize),
    ) -> SnaphuResult<Array2<T>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SnaphuError::MissingFile(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let expected = shape.0 * shape.1 * T::SIZE;
        if bytes.len() != expected {
            return Err(SnaphuError::BufferLength {
                path: path.to_path_buf(),
                expected,
                found: bytes.len(),
            });
        }

        let samples: Vec<T> = bytes.chunks_exact(T::SIZE).map(T::from_bytes).collect();
        log::debug!("Read {} samples from {}", samples.len(), path.display());

        Array2::from_shape_vec(shape, samples).map_err(|_| SnaphuError::ShapeMismatch {
            what: path.display().to_string(),
            expected: shape,
            found: (expected / T::SIZE, 1),
        })
    }
}
