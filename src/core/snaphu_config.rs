use crate::types::{SnaphuError, SnaphuResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Tile overlap SNAPHU gets when none is given, in pixels
pub const DEFAULT_TILE_OVERLAP: usize = 600;

/// A named block of config text with `{placeholder}` fields
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub text: &'static str,
}

impl Template {
    /// Substitute every `{key}` with its value from `values`.
    ///
    /// A placeholder without a value is an error; nothing is left unfilled.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> SnaphuResult<String> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = match after.find('}') {
                Some(close) => close,
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                    break;
                }
            };

            let key = &after[..close];
            let value = values.get(key).ok_or_else(|| SnaphuError::MissingPlaceholder {
                template: self.name.to_string(),
                key: key.to_string(),
            })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

pub const BASE_TEMPLATE: Template = Template {
    name: "base",
    text: "\
######################
# Base configuration #
######################

# Input interferogram and its line length in pixels
INFILE\t{infile}
INFILEFORMAT\t{informat}
LINELENGTH\t{width}
NLOOKSRANGE\t{looks_range}
NLOOKSAZ\t{looks_az}

# Unwrapped output
OUTFILE\t{outfile}
OUTFILEFORMAT\t{outformat}

# Correlation
CORRFILE\t{corfile}
CORRFILEFORMAT\tFLOAT_DATA

# Statistical cost model and solver
STATCOSTMODE\tDEFO
DEFOMAX_CYCLE\t4.0
INITMETHOD\tMCF
MAXNCOMPS\t32

",
};

pub const TILE_TEMPLATE: Template = Template {
    name: "tile",
    text: "\
################
# Tile control #
################

# Tile grid, overlap in pixels (same on both axes), one process per tile
NTILEROW\t{ntilerow}
NTILECOL\t{ntilecol}
ROWOVRLP\t{overlap}
COLOVRLP\t{overlap}
NPROC\t{nproc}

",
};

pub const MASK_TEMPLATE: Template = Template {
    name: "mask",
    text: "\
###########
# Masking #
###########

# Signed byte mask shaped like the input: 0 masks a pixel, 1 keeps it
BYTEMASKFILE\t{mask}

",
};

pub const UNWRAPPED_TEMPLATE: Template = Template {
    name: "unwrapped",
    text: "\
# Input phase is already unwrapped
UNWRAPPED_IN\tTRUE
UNWRAPPEDINFILEFORMAT\tFLOAT_DATA

",
};

/// SNAPHU `INFILEFORMAT` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputFormat {
    #[default]
    FloatData,
    ComplexData,
    AltLineData,
    AltSampleData,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal = match self {
            InputFormat::FloatData => "FLOAT_DATA",
            InputFormat::ComplexData => "COMPLEX_DATA",
            InputFormat::AltLineData => "ALT_LINE_DATA",
            InputFormat::AltSampleData => "ALT_SAMPLE_DATA",
        };
        write!(f, "{}", literal)
    }
}

impl FromStr for InputFormat {
    type Err = SnaphuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FLOAT_DATA" => Ok(InputFormat::FloatData),
            "COMPLEX_DATA" => Ok(InputFormat::ComplexData),
            "ALT_LINE_DATA" => Ok(InputFormat::AltLineData),
            "ALT_SAMPLE_DATA" => Ok(InputFormat::AltSampleData),
            other => Err(SnaphuError::InvalidConfig(format!(
                "Unknown SNAPHU input format: {}",
                other
            ))),
        }
    }
}

/// Tiled unwrapping layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileParams {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_overlap() -> usize {
    DEFAULT_TILE_OVERLAP
}

impl TileParams {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            overlap: DEFAULT_TILE_OVERLAP,
        }
    }

    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// One SNAPHU child process per tile
    pub fn nproc(&self) -> usize {
        self.rows * self.cols
    }
}

/// Parameters of one SNAPHU configuration file
#[derive(Debug, Clone)]
pub struct SnaphuConfig {
    /// Input interferogram (flat binary)
    pub input: PathBuf,
    /// Correlation (flat binary, float)
    pub correlation: PathBuf,
    pub looks_az: u32,
    pub looks_range: u32,
    /// Raster shape as (rows, cols)
    pub shape: (usize, usize),
    /// Where the config file is written
    pub config_path: PathBuf,
    /// Where SNAPHU writes its result
    pub output: PathBuf,
    pub input_format: InputFormat,
    pub tiling: Option<TileParams>,
    pub mask: Option<PathBuf>,
    pub unwrapped: bool,
}

impl SnaphuConfig {
    pub fn new<P, Q, R, S>(
        input: P,
        correlation: Q,
        looks_az: u32,
        looks_range: u32,
        shape: (usize, usize),
        config_path: R,
        output: S,
    ) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
        S: AsRef<Path>,
    {
        Self {
            input: input.as_ref().to_path_buf(),
            correlation: correlation.as_ref().to_path_buf(),
            looks_az,
            looks_range,
            shape,
            config_path: config_path.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_format: InputFormat::default(),
            tiling: None,
            mask: None,
            unwrapped: false,
        }
    }

    pub fn with_tiling(mut self, tiling: TileParams) -> Self {
        self.tiling = Some(tiling);
        self
    }

    pub fn with_mask<P: AsRef<Path>>(mut self, mask: P) -> Self {
        self.mask = Some(mask.as_ref().to_path_buf());
        self
    }

    pub fn with_unwrapped_input(mut self, unwrapped: bool) -> Self {
        self.unwrapped = unwrapped;
        self
    }

    /// `INFILEFORMAT` is never derived from the unwrapped flag
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = format;
        self
    }

    fn validate(&self) -> SnaphuResult<()> {
        if self.shape.1 == 0 {
            return Err(SnaphuError::InvalidConfig(
                "line length (raster width) must be positive".to_string(),
            ));
        }
        if self.looks_az == 0 || self.looks_range == 0 {
            return Err(SnaphuError::InvalidConfig(format!(
                "looks must be positive, got az={} range={}",
                self.looks_az, self.looks_range
            )));
        }
        if let Some(tiling) = &self.tiling {
            if tiling.rows == 0 || tiling.cols == 0 {
                return Err(SnaphuError::InvalidConfig(format!(
                    "tile grid must be at least 1x1, got {}x{}",
                    tiling.rows, tiling.cols
                )));
            }
        }
        Ok(())
    }

    /// Assemble the config text: base, then tiling, masking and
    /// pre-unwrapped sections for whichever of them are requested.
    pub fn render(&self) -> SnaphuResult<String> {
        self.validate()?;

        let mut values: BTreeMap<&str, String> = BTreeMap::new();
        values.insert("infile", self.input.display().to_string());
        values.insert("informat", self.input_format.to_string());
        values.insert("corfile", self.correlation.display().to_string());
        values.insert("looks_az", self.looks_az.to_string());
        values.insert("looks_range", self.looks_range.to_string());
        values.insert("width", self.shape.1.to_string());
        values.insert("outfile", self.output.display().to_string());
        values.insert("outformat", "FLOAT_DATA".to_string());

        let mut sections = vec![BASE_TEMPLATE];

        if let Some(tiling) = &self.tiling {
            values.insert("ntilerow", tiling.rows.to_string());
            values.insert("ntilecol", tiling.cols.to_string());
            values.insert("overlap", tiling.overlap.to_string());
            values.insert("nproc", tiling.nproc().to_string());
            sections.push(TILE_TEMPLATE);
        }

        if let Some(mask) = &self.mask {
            values.insert("mask", mask.display().to_string());
            sections.push(MASK_TEMPLATE);
        }

        if self.unwrapped {
            sections.push(UNWRAPPED_TEMPLATE);
        }

        let mut text = String::new();
        for section in &sections {
            text.push_str(&section.render(&values)?);
        }
        Ok(text)
    }

    /// Write the config file, replacing any existing one.
    ///
    /// Returns the config path and the path SNAPHU will write its output to.
    pub fn write(&self) -> SnaphuResult<(PathBuf, PathBuf)> {
        let text = self.render()?;
        std::fs::write(&self.config_path, text)?;
        log::info!(
            "Wrote SNAPHU config {} (output {})",
            self.config_path.display(),
            self.output.display()
        );
        Ok((self.config_path.clone(), self.output.clone()))
    }
}
