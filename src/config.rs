use std::path::PathBuf;

use clap::Parser;

use crate::types::MAX_ELEVATION;

/// Default octree depth when a record does not request one.
pub const DEFAULT_OCTREE_DEPTH: u8 = 24;

/// Angle unit used in position files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AngleUnit {
    #[value(name = "rad")]
    Radians,
    #[value(name = "deg")]
    Degrees,
}

impl std::fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AngleUnit::Radians => write!(f, "rad"),
            AngleUnit::Degrees => write!(f, "deg"),
        }
    }
}

/// Stopping rule for the Helmert inverse fixed-point solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertConfig {
    /// Per-axis agreement of successive shifts, in metres.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for HelmertConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_iterations: 100,
        }
    }
}

/// Library-level conversion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    pub default_depth: u8,
    /// Half-range of the octree elevation axis, in metres.
    pub max_elevation: f64,
    pub helmert: HelmertConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_OCTREE_DEPTH,
            max_elevation: MAX_ELEVATION,
            helmert: HelmertConfig::default(),
        }
    }
}

/// Where the datum of a position file comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatumSource {
    Catalog(String),
    File(PathBuf),
}

impl Default for DatumSource {
    fn default() -> Self {
        DatumSource::Catalog("WGS84".into())
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub datum: DatumSource,
    pub angles: AngleUnit,
    pub conversion: ConversionConfig,
    pub list_datums: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            datum: DatumSource::default(),
            angles: AngleUnit::Radians,
            conversion: ConversionConfig::default(),
            list_datums: false,
            verbose: false,
            threads: None,
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "datum-shift",
    about = "Convert positions between a local datum and WGS84 and attach octree codes",
    version
)]
pub struct CliArgs {
    /// Input JSON file with an array of position records
    #[arg(short = 'i', long, required_unless_present = "list_datums")]
    pub input: Option<PathBuf>,

    /// Output JSON file
    #[arg(short = 'o', long, required_unless_present = "list_datums")]
    pub output: Option<PathBuf>,

    /// Catalog datum name (e.g. ED50, OSGB36)
    #[arg(short = 'd', long, default_value = "WGS84", conflicts_with = "datum_file")]
    pub datum: String,

    /// JSON file with a custom datum definition
    #[arg(long)]
    pub datum_file: Option<PathBuf>,

    /// Angle unit used in the position files: rad or deg
    #[arg(long, value_enum, default_value = "rad")]
    pub angles: AngleUnit,

    /// Octree depth for records that do not request one
    #[arg(long, default_value_t = DEFAULT_OCTREE_DEPTH, value_parser = clap::value_parser!(u8).range(1..))]
    pub default_depth: u8,

    /// Half-range of the octree elevation axis in metres
    #[arg(long, default_value_t = MAX_ELEVATION)]
    pub max_elevation: f64,

    /// Helmert inverse convergence tolerance in metres
    #[arg(long, default_value_t = 0.001)]
    pub helmert_tolerance: f64,

    /// Helmert inverse iteration cap
    #[arg(long, default_value_t = 100)]
    pub helmert_max_iterations: usize,

    /// List catalog datums and exit
    #[arg(long)]
    pub list_datums: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        let datum = match args.datum_file {
            Some(path) => DatumSource::File(path),
            None => DatumSource::Catalog(args.datum),
        };

        PipelineConfig {
            input: args.input.unwrap_or_default(),
            output: args.output.unwrap_or_default(),
            datum,
            angles: args.angles,
            conversion: ConversionConfig {
                default_depth: args.default_depth,
                max_elevation: args.max_elevation,
                helmert: HelmertConfig {
                    tolerance: args.helmert_tolerance,
                    max_iterations: args.helmert_max_iterations,
                },
            },
            list_datums: args.list_datums,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}
