use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use snaphu_bridge::{
    binary_to_raster, raster_to_binary, InputFormat, PixelType, RasterReader, SnaphuConfig,
    TileParams, UnwrapJob,
};
use std::path::PathBuf;

/// Convert rasters for SNAPHU, run it and georeference the result
#[derive(Parser)]
#[command(name = "snaphu-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full conversion, unwrapping and back-conversion
    Run {
        /// JSON job description
        #[arg(long, conflicts_with = "dir")]
        job: Option<PathBuf>,

        /// Directory holding the bursts_*.tif product
        #[arg(long)]
        dir: Option<PathBuf>,

        /// SNAPHU executable
        #[arg(long)]
        snaphu: Option<PathBuf>,

        /// Tile grid as ROWSxCOLS, e.g. 3x3
        #[arg(long)]
        tiles: Option<String>,

        /// Tile overlap in pixels
        #[arg(long, default_value_t = snaphu_bridge::core::DEFAULT_TILE_OVERLAP)]
        overlap: usize,
    },

    /// Dump band 1 of a raster to a flat binary file
    ToBinary {
        raster: PathBuf,
        binary: PathBuf,

        /// Float32, Byte or CFloat32 (written as phase)
        #[arg(short, long, default_value = "Float32")]
        pixel_type: String,
    },

    /// Rebuild a masked GeoTIFF from a flat binary file
    ToRaster {
        binary: PathBuf,
        /// Raster supplying shape, type and georeferencing
        template: PathBuf,
        /// Byte raster, 0 marks nodata
        mask: PathBuf,
        output: PathBuf,
    },

    /// Write a SNAPHU config file
    Config {
        /// Input interferogram binary
        #[arg(long)]
        input: PathBuf,

        /// Correlation binary
        #[arg(long)]
        correlation: PathBuf,

        /// Raster whose shape the binaries have
        #[arg(long, required_unless_present = "width")]
        template: Option<PathBuf>,

        /// Line length in pixels, instead of --template
        #[arg(long)]
        width: Option<usize>,

        #[arg(long, default_value_t = 4)]
        looks_az: u32,

        #[arg(long, default_value_t = 20)]
        looks_range: u32,

        /// Config file to write
        #[arg(short, long, default_value = "snaphu.conf")]
        config: PathBuf,

        /// SNAPHU output binary
        #[arg(short, long)]
        output: PathBuf,

        /// Tile grid as ROWSxCOLS
        #[arg(long)]
        tiles: Option<String>,

        #[arg(long, default_value_t = snaphu_bridge::core::DEFAULT_TILE_OVERLAP)]
        overlap: usize,

        /// Byte mask binary
        #[arg(long)]
        mask: Option<PathBuf>,

        /// Input phase is already unwrapped
        #[arg(long)]
        unwrapped: bool,

        /// INFILEFORMAT value
        #[arg(long, default_value = "FLOAT_DATA")]
        input_format: String,
    },
}

fn parse_tiles(spec: &str, overlap: usize) -> Result<TileParams> {
    let (rows, cols) = spec
        .split_once(['x', 'X'])
        .with_context(|| format!("Tile grid must look like 3x3, got {}", spec))?;
    let rows: usize = rows.trim().parse().context("Invalid tile row count")?;
    let cols: usize = cols.trim().parse().context("Invalid tile column count")?;
    Ok(TileParams::new(rows, cols).with_overlap(overlap))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            job,
            dir,
            snaphu,
            tiles,
            overlap,
        } => {
            let mut job = match (job, dir) {
                (Some(path), _) => UnwrapJob::from_file(&path)
                    .with_context(|| format!("Failed to load job {}", path.display()))?,
                (None, Some(dir)) => UnwrapJob::bursts(dir),
                (None, None) => UnwrapJob::bursts("."),
            };
            if let Some(exe) = snaphu {
                job.executable = exe;
            }
            if let Some(spec) = tiles {
                job.tiling = Some(parse_tiles(&spec, overlap)?);
            }
            let output = job.run()?;
            println!("{}", output.display());
        }
        Commands::ToBinary {
            raster,
            binary,
            pixel_type,
        } => {
            let pixel_type: PixelType = pixel_type.parse()?;
            raster_to_binary(&raster, &binary, pixel_type)?;
        }
        Commands::ToRaster {
            binary,
            template,
            mask,
            output,
        } => {
            binary_to_raster(&binary, &template, &mask, &output)?;
        }
        Commands::Config {
            input,
            correlation,
            template,
            width,
            looks_az,
            looks_range,
            config,
            output,
            tiles,
            overlap,
            mask,
            unwrapped,
            input_format,
        } => {
            let shape = match (template, width) {
                (Some(template), _) => RasterReader::info(&template)?.shape(),
                (None, Some(width)) => (0, width),
                (None, None) => bail!("Either --template or --width is required"),
            };
            let input_format: InputFormat = input_format.parse()?;

            let mut snaphu_config = SnaphuConfig::new(
                &input,
                &correlation,
                looks_az,
                looks_range,
                shape,
                &config,
                &output,
            )
            .with_unwrapped_input(unwrapped)
            .with_input_format(input_format);
            if let Some(spec) = tiles {
                snaphu_config = snaphu_config.with_tiling(parse_tiles(&spec, overlap)?);
            }
            if let Some(mask) = mask {
                snaphu_config = snaphu_config.with_mask(mask);
            }

            let (config_path, _) = snaphu_config.write()?;
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
