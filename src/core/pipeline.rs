use crate::core::convert::{binary_to_raster, raster_to_binary};
use crate::core::runner::SnaphuRunner;
use crate::core::snaphu_config::{InputFormat, SnaphuConfig, TileParams};
use crate::io::RasterReader;
use crate::types::{PixelType, SnaphuError, SnaphuResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// What a raster contributes to an unwrapping job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterRole {
    Unwrapped,
    UnwrappedCorrected,
    Wrapped,
    Correlation,
    Mask,
}

impl RasterRole {
    pub const ALL: [RasterRole; 5] = [
        RasterRole::Unwrapped,
        RasterRole::UnwrappedCorrected,
        RasterRole::Wrapped,
        RasterRole::Correlation,
        RasterRole::Mask,
    ];

    /// File stem used by the burst product layout
    pub fn burst_stem(&self) -> &'static str {
        match self {
            RasterRole::Unwrapped => "bursts_unwrapped",
            RasterRole::UnwrappedCorrected => "bursts_unwrapped_corrected",
            RasterRole::Wrapped => "bursts_wrapped",
            RasterRole::Correlation => "bursts_correlation",
            RasterRole::Mask => "bursts_mask",
        }
    }

    pub fn default_pixel_type(&self) -> PixelType {
        match self {
            RasterRole::Mask => PixelType::Byte,
            _ => PixelType::Float32,
        }
    }
}

/// A raster and the flat binary it is converted to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterInput {
    pub raster: PathBuf,
    pub binary: PathBuf,
    pub pixel_type: PixelType,
}

fn default_input_role() -> RasterRole {
    RasterRole::Unwrapped
}

fn default_looks_az() -> u32 {
    4
}

fn default_looks_range() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_executable() -> PathBuf {
    PathBuf::from("snaphu")
}

/// Everything one SNAPHU run over a set of rasters needs.
///
/// The wrapped raster is the georeferencing template of the result and the
/// mask raster decides which output pixels become nodata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnwrapJob {
    pub inputs: BTreeMap<RasterRole, RasterInput>,
    /// Role whose binary is handed to SNAPHU as `INFILE`
    #[serde(default = "default_input_role")]
    pub input_role: RasterRole,
    #[serde(default = "default_looks_az")]
    pub looks_az: u32,
    #[serde(default = "default_looks_range")]
    pub looks_range: u32,
    #[serde(default)]
    pub tiling: Option<TileParams>,
    #[serde(default)]
    pub input_format: InputFormat,
    #[serde(default = "default_true")]
    pub unwrapped_input: bool,
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    pub config_path: PathBuf,
    pub log_path: PathBuf,
    pub output_binary: PathBuf,
    pub output_raster: PathBuf,
}

impl UnwrapJob {
    /// The `bursts_*.tif` product layout inside `dir`
    pub fn bursts<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let inputs = RasterRole::ALL
            .iter()
            .map(|role| {
                let stem = role.burst_stem();
                (
                    *role,
                    RasterInput {
                        raster: dir.join(format!("{}.tif", stem)),
                        binary: dir.join(format!("{}.bin", stem)),
                        pixel_type: role.default_pixel_type(),
                    },
                )
            })
            .collect();

        Self {
            inputs,
            input_role: default_input_role(),
            looks_az: default_looks_az(),
            looks_range: default_looks_range(),
            tiling: None,
            input_format: InputFormat::default(),
            unwrapped_input: true,
            executable: default_executable(),
            config_path: dir.join("snaphu.conf"),
            log_path: dir.join("snaphu.log"),
            output_binary: dir.join("bursts_reunwrapped.bin"),
            output_raster: dir.join("bursts_reunwrapped.tif"),
        }
    }

    /// Load a job description from JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> SnaphuResult<Self> {
        let file = File::open(path)?;
        let job: UnwrapJob = serde_json::from_reader(BufReader::new(file))?;
        Ok(job)
    }

    pub fn input(&self, role: RasterRole) -> SnaphuResult<&RasterInput> {
        self.inputs.get(&role).ok_or_else(|| {
            SnaphuError::InvalidConfig(format!("job has no {:?} raster", role))
        })
    }

    /// Check required roles are present and every input raster exists
    pub fn validate(&self) -> SnaphuResult<()> {
        for role in [
            self.input_role,
            RasterRole::Wrapped,
            RasterRole::Correlation,
            RasterRole::Mask,
        ] {
            self.input(role)?;
        }
        for input in self.inputs.values() {
            if !input.raster.exists() {
                return Err(SnaphuError::MissingFile(input.raster.clone()));
            }
        }
        Ok(())
    }

    /// Convert every input to binary and write the SNAPHU config.
    ///
    /// Returns the config path and SNAPHU's output path.
    pub fn prepare(&self) -> SnaphuResult<(PathBuf, PathBuf)> {
        self.validate()?;

        for (role, input) in &self.inputs {
            log::debug!("Preparing {:?} raster", role);
            raster_to_binary(&input.raster, &input.binary, input.pixel_type)?;
        }

        let wrapped = self.input(RasterRole::Wrapped)?;
        let info = RasterReader::info(&wrapped.raster)?;
        log::info!("Interferogram size: {} lines x {} pixels", info.height, info.width);

        let mut config = SnaphuConfig::new(
            &self.input(self.input_role)?.binary,
            &self.input(RasterRole::Correlation)?.binary,
            self.looks_az,
            self.looks_range,
            info.shape(),
            &self.config_path,
            &self.output_binary,
        )
        .with_mask(&self.input(RasterRole::Mask)?.binary)
        .with_unwrapped_input(self.unwrapped_input)
        .with_input_format(self.input_format);
        if let Some(tiling) = self.tiling {
            config = config.with_tiling(tiling);
        }

        config.write()
    }

    /// Georeference SNAPHU's output using the wrapped raster and the mask
    pub fn finish(&self) -> SnaphuResult<PathBuf> {
        binary_to_raster(
            &self.output_binary,
            &self.input(RasterRole::Wrapped)?.raster,
            &self.input(RasterRole::Mask)?.raster,
            &self.output_raster,
        )?;
        Ok(self.output_raster.clone())
    }

    /// Convert, configure, unwrap and convert back; the first failure
    /// aborts the run and files already written stay on disk.
    pub fn run(&self) -> SnaphuResult<PathBuf> {
        let (config_path, output_binary) = self.prepare()?;

        log::info!("Outputting unwrapped phase to {}", output_binary.display());
        SnaphuRunner::new(&self.executable, &self.log_path).run(&config_path)?;

        let output = self.finish()?;
        log::info!("Wrote {}", output.display());
        Ok(output)
    }
}
