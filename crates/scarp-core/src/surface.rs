//! ESRI-style ASCII grid ingestion.
//!
//! Optional two-token header lines (`ncols 4`, `cellsize 50`, …) precede
//! whitespace-separated rows of elevations, northernmost row first.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::georef::{Hemisphere, MapReference};
use crate::heightfield::{ElevationGrid, DEFAULT_NODATA};

/// Georeferencing header. Every key is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AsciiHeader {
    pub ncols: Option<usize>,
    pub nrows: Option<usize>,
    pub xllcorner: Option<f64>,
    pub yllcorner: Option<f64>,
    pub xllcenter: Option<f64>,
    pub yllcenter: Option<f64>,
    pub cellsize: Option<f64>,
    pub nodata_value: Option<f64>,
}

impl AsciiHeader {
    /// Easting of the lower-left corner.
    pub fn x_corner(&self) -> Option<f64> {
        corner(self.xllcorner, self.xllcenter, self.cellsize)
    }

    /// Northing of the lower-left corner.
    pub fn y_corner(&self) -> Option<f64> {
        corner(self.yllcorner, self.yllcenter, self.cellsize)
    }

    /// Map reference anchored at the header corner; a missing corner is 0.
    pub fn map_reference(&self, hemisphere: Hemisphere) -> MapReference {
        MapReference {
            x_ref: self.x_corner().unwrap_or(0.0),
            y_ref: self.y_corner().unwrap_or(0.0),
            hemisphere,
        }
    }

    fn set(&mut self, key: &str, value: &str, line: usize) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "ncols" => self.ncols = Some(parse_count(value, line)?),
            "nrows" => self.nrows = Some(parse_count(value, line)?),
            "xllcorner" => self.xllcorner = Some(parse_value(value, line)?),
            "yllcorner" => self.yllcorner = Some(parse_value(value, line)?),
            "xllcenter" => self.xllcenter = Some(parse_value(value, line)?),
            "yllcenter" => self.yllcenter = Some(parse_value(value, line)?),
            "cellsize" => self.cellsize = Some(parse_value(value, line)?),
            "nodata_value" => self.nodata_value = Some(parse_value(value, line)?),
            _ => {}
        }
        Ok(())
    }
}

/// Snap a centre coordinate down to its cell corner; fall back to the corner key.
fn corner(corner: Option<f64>, centre: Option<f64>, cellsize: Option<f64>) -> Option<f64> {
    match (centre, cellsize) {
        (Some(c), Some(cs)) if cs > 0.0 => Some(c - c.rem_euclid(cs)),
        (Some(c), _) => Some(c),
        (None, _) => corner,
    }
}

fn parse_value(token: &str, line: usize) -> Result<f64> {
    token.parse().map_err(|_| Error::Parse {
        line,
        reason: format!("'{token}' is not a number"),
    })
}

fn parse_count(token: &str, line: usize) -> Result<usize> {
    token.parse().map_err(|_| Error::Parse {
        line,
        reason: format!("'{token}' is not a cell count"),
    })
}

/// Header keys start with a letter and are not themselves numbers (`nan`, `inf`).
fn is_header_key(token: &str) -> bool {
    token.starts_with(|ch: char| ch.is_ascii_alphabetic()) && token.parse::<f64>().is_err()
}

/// A parsed ASCII grid, before conversion to an [`ElevationGrid`].
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    pub header: AsciiHeader,
    pub rows: Vec<Vec<f64>>,
}

impl AsciiGrid {
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Convert to an elevation grid. `cellsize` overrides the header value.
    pub fn into_elevation_grid(self, cellsize: Option<f64>) -> Result<ElevationGrid> {
        let cellsize = cellsize.or(self.header.cellsize).ok_or(Error::MissingCellsize)?;
        let nodata = self.header.nodata_value.unwrap_or(DEFAULT_NODATA);
        ElevationGrid::from_rows(self.rows, cellsize, nodata)
    }
}

/// Parse an ASCII grid from any buffered reader.
pub fn read_ascii_grid<R: BufRead>(reader: R) -> Result<AsciiGrid> {
    let mut header = AsciiHeader::default();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            continue;
        };

        if is_header_key(first) {
            if !rows.is_empty() {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!("header key '{first}' after cell data"),
                });
            }
            if tokens.len() != 2 {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!("header '{first}' needs exactly one value"),
                });
            }
            header.set(first, tokens[1], line_no)?;
            continue;
        }

        let values = tokens
            .iter()
            .map(|token| parse_value(token, line_no))
            .collect::<Result<Vec<f64>>>()?;
        if let Some(expected) = rows.first().map(Vec::len) {
            if values.len() != expected {
                return Err(Error::RaggedRow {
                    row: rows.len(),
                    expected,
                    found: values.len(),
                });
            }
        }
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(Error::Empty);
    }
    if let (Some(nrows), Some(ncols)) = (header.nrows, header.ncols) {
        let found = rows.len() * rows[0].len();
        if nrows * ncols != found {
            return Err(Error::CellCountMismatch { nrows, ncols, found });
        }
    }

    Ok(AsciiGrid { header, rows })
}

/// Open and parse an ASCII grid file.
pub fn read_ascii_grid_file(path: impl AsRef<Path>) -> Result<AsciiGrid> {
    let file = File::open(path)?;
    read_ascii_grid(BufReader::new(file))
}
