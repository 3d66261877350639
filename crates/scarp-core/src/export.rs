//! Tabular export of slope and aspect layers, plus a JSON run summary.
//!
//! Each table has one line per grid row with single-space separated values.
//! Slopes are rounded to one decimal place; aspects are written as computed.
//! Undefined values are written as `nan`.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{CellResult, CellStatus, TieReport};
use crate::error::Result;
use crate::georef::MapExtent;
use crate::gradient::{GradientGrid, GradientResult};
use crate::heightfield::ElevationGrid;
use crate::params::GradientParams;

pub const SLOPE_PERCENT_FILE: &str = "slope_map_perc.txt";
pub const SLOPE_DEGREES_FILE: &str = "slope_map_deg.txt";
pub const ASPECT_FILE: &str = "aspect_map.txt";
pub const SUMMARY_FILE: &str = "summary.json";

fn format_rounded(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    }
}

fn format_raw(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

fn write_layer<W: Write>(
    out: &mut W,
    grid: &GradientGrid,
    value: impl Fn(&CellResult) -> String,
) -> Result<()> {
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(&value).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

pub fn write_slope_percent<W: Write>(out: &mut W, grid: &GradientGrid) -> Result<()> {
    write_layer(out, grid, |cell| format_rounded(cell.slope_percent))
}

pub fn write_slope_degrees<W: Write>(out: &mut W, grid: &GradientGrid) -> Result<()> {
    write_layer(out, grid, |cell| format_rounded(cell.slope_degrees))
}

pub fn write_aspect<W: Write>(out: &mut W, grid: &GradientGrid) -> Result<()> {
    write_layer(out, grid, |cell| format_raw(cell.aspect))
}

fn write_file(
    path: PathBuf,
    grid: &GradientGrid,
    writer: fn(&mut BufWriter<File>, &GradientGrid) -> Result<()>,
) -> Result<PathBuf> {
    let mut out = BufWriter::new(File::create(&path)?);
    writer(&mut out, grid)?;
    out.flush()?;
    Ok(path)
}

/// Write the layers selected by `params` into `dir`, creating it if needed.
/// Returns the paths written.
pub fn write_outputs(dir: &Path, grid: &GradientGrid, params: &GradientParams) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    if params.slope_map.percent() {
        written.push(write_file(dir.join(SLOPE_PERCENT_FILE), grid, write_slope_percent)?);
    }
    if params.slope_map.degrees() {
        written.push(write_file(dir.join(SLOPE_DEGREES_FILE), grid, write_slope_degrees)?);
    }
    if params.aspect_map {
        written.push(write_file(dir.join(ASPECT_FILE), grid, write_aspect)?);
    }
    Ok(written)
}

/// Cell counts per terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub resolved: usize,
    pub filled: usize,
    pub unresolved_pit: usize,
    pub ambiguous: usize,
    pub no_data: usize,
}

/// Slope statistics over cells with a defined slope, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlopeStats {
    pub min_deg: f64,
    pub max_deg: f64,
    pub mean_deg: f64,
}

/// Machine-readable account of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct GradientSummary {
    pub width: usize,
    pub height: usize,
    pub cellsize: f64,
    pub params: GradientParams,
    pub cells: StatusCounts,
    pub ties: TieReport,
    pub slope: Option<SlopeStats>,
    pub extent: MapExtent,
}

impl GradientSummary {
    pub fn new(dem: &ElevationGrid, result: &GradientResult, params: &GradientParams) -> Self {
        let mut cells = StatusCounts::default();
        for cell in &result.gradient.cells {
            match cell.status() {
                CellStatus::Resolved => cells.resolved += 1,
                CellStatus::Filled => cells.filled += 1,
                CellStatus::UnresolvedPit => cells.unresolved_pit += 1,
                CellStatus::Ambiguous => cells.ambiguous += 1,
                CellStatus::NoData => cells.no_data += 1,
            }
        }

        let degrees: Vec<f64> = result
            .gradient
            .cells
            .iter()
            .map(|cell| cell.slope_degrees)
            .filter(|deg| deg.is_finite())
            .collect();
        let slope = (!degrees.is_empty()).then(|| SlopeStats {
            min_deg: degrees.iter().copied().fold(f64::INFINITY, f64::min),
            max_deg: degrees.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_deg: degrees.iter().sum::<f64>() / degrees.len() as f64,
        });

        Self {
            width: dem.width,
            height: dem.height,
            cellsize: dem.cellsize,
            params: params.clone(),
            cells,
            ties: result.ties,
            slope,
            extent: params.reference.extent(dem.height, dem.width, dem.cellsize),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
