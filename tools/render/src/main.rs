//! Map renderer: writes elevation, slope and aspect PNGs for an ASCII DEM.
//!
//! Slope and aspect layers follow the `slope_map` / `aspect_map` params, the
//! same as the text tables written by `scarp analyse`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scarp_core::analysis::CellResult;
use scarp_core::georef::Hemisphere;
use scarp_core::gradient::GradientGrid;
use scarp_core::surface::read_ascii_grid_file;
use scarp_core::{compute_gradient, ElevationGrid, GradientParams, SlopeMap};

#[derive(Parser, Debug)]
#[command(name = "render", about = "Render elevation, slope and aspect maps as PNG")]
struct Args {
    /// Input ASCII grid
    input: PathBuf,

    /// Output directory (created if absent)
    #[arg(short, long, default_value = "maps")]
    output: PathBuf,

    /// Cell size in metres; overrides the raster header
    #[arg(long)]
    cellsize: Option<f64>,

    /// JSON params file; selects the slope and aspect layers
    #[arg(long)]
    params: Option<PathBuf>,

    /// Leave sinks unfilled
    #[arg(long)]
    no_fill: bool,
}

// ── Colour helpers ────────────────────────────────────────────────────────────

const MISSING: [u8; 3] = [0, 0, 0];

/// 16 sectors of 22.5°, N red through E cyan-blue, S green, W orange, back to red.
const ASPECT_PALETTE: [[u8; 3]; 16] = [
    [255, 0, 0],     // red
    [238, 130, 238], // violet
    [238, 130, 238],
    [65, 105, 225], // royal blue
    [65, 105, 225],
    [0, 191, 255], // deep sky blue
    [0, 191, 255],
    [0, 255, 255], // cyan
    [0, 255, 255],
    [0, 255, 0], // lime
    [0, 255, 0],
    [255, 255, 0], // yellow
    [255, 255, 0],
    [255, 165, 0], // orange
    [255, 165, 0],
    [255, 0, 0],
];

fn aspect_rgb(aspect: f64) -> [u8; 3] {
    if aspect.is_nan() {
        return MISSING;
    }
    let sector = (aspect.rem_euclid(360.0) / 22.5) as usize;
    ASPECT_PALETTE[sector.min(15)]
}

/// Reversed "winter" ramp: flat = spring green, steepest = blue.
fn slope_rgb(t: f64) -> [u8; 3] {
    if t.is_nan() {
        return MISSING;
    }
    let t = t.clamp(0.0, 1.0);
    let g = (255.0 * (1.0 - t)) as u8;
    let b = (128.0 + 127.0 * t) as u8;
    [0, g, b]
}

fn gray(t: f64) -> [u8; 3] {
    if t.is_nan() {
        return MISSING;
    }
    let c = (t.clamp(0.0, 1.0) * 255.0) as u8;
    [c, c, c]
}

fn save(
    out_dir: &Path,
    name: &str,
    width: usize,
    height: usize,
    pixel: impl Fn(usize, usize) -> [u8; 3],
) -> Result<()> {
    let mut img = image::RgbImage::new(width as u32, height as u32);
    for r in 0..height {
        for c in 0..width {
            img.put_pixel(c as u32, r as u32, image::Rgb(pixel(r, c)));
        }
    }
    let path = out_dir.join(name);
    img.save(&path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

// ── Maps ──────────────────────────────────────────────────────────────────────

fn render_elevation(out_dir: &Path, dem: &ElevationGrid) -> Result<()> {
    let min_z = dem.min_elevation().unwrap_or(0.0);
    let max_z = dem.max_elevation().unwrap_or(0.0);
    let range = (max_z - min_z).max(1e-9);
    save(out_dir, "elevation.png", dem.width, dem.height, |r, c| {
        let z = dem.get(r, c);
        if dem.is_nodata(z) {
            MISSING
        } else {
            gray((z - min_z) / range)
        }
    })
}

type SlopeLayer = (&'static str, fn(&CellResult) -> f64);

fn percent(cell: &CellResult) -> f64 {
    cell.slope_percent
}

fn degrees(cell: &CellResult) -> f64 {
    cell.slope_degrees
}

const SLOPE_PERCENT_LAYER: SlopeLayer = ("slope_percent.png", percent);
const SLOPE_DEGREES_LAYER: SlopeLayer = ("slope_degrees.png", degrees);

fn slope_layers(slope_map: SlopeMap) -> Vec<SlopeLayer> {
    let mut layers = Vec::new();
    if slope_map.percent() {
        layers.push(SLOPE_PERCENT_LAYER);
    }
    if slope_map.degrees() {
        layers.push(SLOPE_DEGREES_LAYER);
    }
    layers
}

/// Ramp scaled to the steepest cell of the layer.
fn render_slope(out_dir: &Path, grid: &GradientGrid, (name, value): SlopeLayer) -> Result<()> {
    let max = grid
        .cells
        .iter()
        .map(value)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max)
        .max(1e-9);
    save(out_dir, name, grid.width, grid.height, |r, c| {
        slope_rgb(value(grid.get(r, c)) / max)
    })
}

fn render_aspect(out_dir: &Path, grid: &GradientGrid) -> Result<()> {
    save(out_dir, "aspect.png", grid.width, grid.height, |r, c| {
        aspect_rgb(grid.get(r, c).aspect)
    })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ascii = read_ascii_grid_file(&args.input)
        .with_context(|| format!("Failed to read DEM: {}", args.input.display()))?;
    let mut params = match &args.params {
        Some(path) => GradientParams::from_json_file(path)
            .with_context(|| format!("Failed to load params: {}", path.display()))?,
        None => GradientParams {
            reference: ascii.header.map_reference(Hemisphere::North),
            ..GradientParams::default()
        },
    };
    if args.no_fill {
        params.fill_sinks = false;
    }
    let dem = ascii.into_elevation_grid(args.cellsize)?;

    let extent = params.reference.extent(dem.height, dem.width, dem.cellsize);
    let (left, right) = extent.x_labels();
    info!("Map extent: {left} .. {right}, top {}", extent.top_label());
    info!("Computing gradient for {} x {} cells…", dem.width, dem.height);
    let result = compute_gradient(&dem, &params);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    render_elevation(&args.output, &dem)?;
    for layer in slope_layers(params.slope_map) {
        render_slope(&args.output, &result.gradient, layer)?;
    }
    if params.aspect_map {
        render_aspect(&args.output, &result.gradient)?;
    }

    info!("Done.");
    Ok(())
}
