//! Command-line front end: D8 slope and aspect maps from an ASCII DEM.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scarp_core::export::{write_outputs, GradientSummary, SUMMARY_FILE};
use scarp_core::georef::Hemisphere;
use scarp_core::surface::{read_ascii_grid_file, AsciiGrid};
use scarp_core::{compute_gradient, GradientParams, SlopeMap, TieReference};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scarp", version, about = "D8 slope and aspect analysis of ASCII elevation grids")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute slope and aspect tables for a DEM
    Analyse(AnalyseArgs),
    /// Show header, size, elevation range and map extent of a DEM
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Input ASCII grid
    input: PathBuf,

    /// Output directory (created if absent)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Cell size in metres; overrides the raster header
    #[arg(long)]
    cellsize: Option<f64>,

    /// JSON params file; flags below override its fields
    #[arg(long)]
    params: Option<PathBuf>,

    /// Fill interior sinks that have no downhill neighbour
    #[arg(long, value_enum)]
    fill_sinks: Option<YesNo>,

    /// Slope layers to write: p(ercent), d(egrees) or b(oth)
    #[arg(long, value_enum)]
    slope_map: Option<SlopeMapArg>,

    /// Write the aspect layer
    #[arg(long, value_enum)]
    aspect_map: Option<YesNo>,

    /// Easting of the lower-left corner (metres)
    #[arg(long, allow_negative_numbers = true)]
    x_ref: Option<f64>,

    /// Northing of the lower-left corner (metres)
    #[arg(long, allow_negative_numbers = true)]
    y_ref: Option<f64>,

    /// Hemisphere of the lower-left corner
    #[arg(long, value_enum)]
    hemisphere: Option<HemisphereArg>,

    /// Which neighbour breaks ties between equally steep directions
    #[arg(long, value_enum)]
    tie_reference: Option<TieReferenceArg>,

    /// Print the resolved parameters before running
    #[arg(long)]
    show_params: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Input ASCII grid
    input: PathBuf,

    /// Cell size in metres; overrides the raster header
    #[arg(long)]
    cellsize: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum YesNo {
    #[value(alias = "yes")]
    Y,
    #[value(alias = "no")]
    N,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SlopeMapArg {
    #[value(alias = "percent")]
    P,
    #[value(alias = "degrees")]
    D,
    #[value(alias = "both")]
    B,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HemisphereArg {
    #[value(alias = "north")]
    N,
    #[value(alias = "south")]
    S,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TieReferenceArg {
    Downstream,
    Upstream,
}

impl From<YesNo> for bool {
    fn from(v: YesNo) -> bool {
        matches!(v, YesNo::Y)
    }
}

impl From<SlopeMapArg> for SlopeMap {
    fn from(v: SlopeMapArg) -> Self {
        match v {
            SlopeMapArg::P => SlopeMap::Percent,
            SlopeMapArg::D => SlopeMap::Degrees,
            SlopeMapArg::B => SlopeMap::Both,
        }
    }
}

impl From<HemisphereArg> for Hemisphere {
    fn from(v: HemisphereArg) -> Self {
        match v {
            HemisphereArg::N => Hemisphere::North,
            HemisphereArg::S => Hemisphere::South,
        }
    }
}

impl From<TieReferenceArg> for TieReference {
    fn from(v: TieReferenceArg) -> Self {
        match v {
            TieReferenceArg::Downstream => TieReference::Downstream,
            TieReferenceArg::Upstream => TieReference::Upstream,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn read_dem(path: &Path) -> Result<AsciiGrid> {
    read_ascii_grid_file(path).with_context(|| format!("Failed to read DEM: {}", path.display()))
}

/// Params file (or defaults, anchored at the header's lower-left corner),
/// then individual flags on top.
fn resolve_params(args: &AnalyseArgs, dem: &AsciiGrid) -> Result<GradientParams> {
    let mut params = match &args.params {
        Some(path) => GradientParams::from_json_file(path)
            .with_context(|| format!("Failed to load params: {}", path.display()))?,
        None => GradientParams {
            reference: dem.header.map_reference(Hemisphere::North),
            ..GradientParams::default()
        },
    };

    if let Some(v) = args.fill_sinks {
        params.fill_sinks = v.into();
    }
    if let Some(v) = args.slope_map {
        params.slope_map = v.into();
    }
    if let Some(v) = args.aspect_map {
        params.aspect_map = v.into();
    }
    if let Some(v) = args.x_ref {
        params.reference.x_ref = v;
    }
    if let Some(v) = args.y_ref {
        params.reference.y_ref = v;
    }
    if let Some(v) = args.hemisphere {
        params.reference.hemisphere = v.into();
    }
    if let Some(v) = args.tie_reference {
        params.tie_reference = v.into();
    }

    params.validate()?;
    Ok(params)
}

// ─── Commands ───────────────────────────────────────────────────────────

fn analyse(args: AnalyseArgs) -> Result<()> {
    let ascii = read_dem(&args.input)?;
    let params = resolve_params(&args, &ascii)?;
    if args.show_params {
        println!("{}", serde_json::to_string_pretty(&params)?);
    }

    let dem = ascii
        .into_elevation_grid(args.cellsize)
        .context("Cannot build elevation grid")?;
    info!(
        "Loaded {}: {} x {} cells, cellsize {}",
        args.input.display(),
        dem.width,
        dem.height,
        dem.cellsize
    );

    let result = compute_gradient(&dem, &params);

    let written = write_outputs(&args.output, &result.gradient, &params)
        .with_context(|| format!("Failed to write tables to {}", args.output.display()))?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    let summary_path = args.output.join(SUMMARY_FILE);
    GradientSummary::new(&dem, &result, &params)
        .write_json(&summary_path)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    info!("Wrote {}", summary_path.display());

    Ok(())
}

fn show_info(args: InfoArgs) -> Result<()> {
    let ascii = read_dem(&args.input)?;
    let header = ascii.header;
    let dem = ascii
        .into_elevation_grid(args.cellsize)
        .context("Cannot build elevation grid")?;

    println!("File: {}", args.input.display());
    println!("Dimensions: {} x {} ({} cells)", dem.width, dem.height, dem.data.len());
    println!("Cell size: {}", dem.cellsize);
    println!("NoData: {}", dem.nodata);
    println!("Valid cells: {}", dem.valid_count());
    if let (Some(min), Some(max)) = (dem.min_elevation(), dem.max_elevation()) {
        println!("Elevation: {min:.3} .. {max:.3}");
    }

    let extent = header
        .map_reference(Hemisphere::North)
        .extent(dem.height, dem.width, dem.cellsize);
    let (left, right) = extent.x_labels();
    println!("Extent: {left} .. {right}, top {}", extent.top_label());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Analyse(args) => analyse(args),
        Commands::Info(args) => show_info(args),
    }
}
