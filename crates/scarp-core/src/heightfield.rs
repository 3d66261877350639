use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Nodata sentinel used when a raster header does not declare one.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// True when `value` carries no measurement: equal to the sentinel, or NaN.
#[inline]
pub fn is_nodata(value: f64, nodata: f64) -> bool {
    value == nodata || value.is_nan()
}

/// A rectangular elevation grid, row-major, row 0 northernmost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationGrid {
    /// Row-major elevation values. Cells equal to `nodata` are unmeasured.
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
    /// Linear cell size, in the same unit as the elevations.
    pub cellsize: f64,
    pub nodata: f64,
}

impl ElevationGrid {
    /// Create a grid filled with the given value.
    pub fn new(width: usize, height: usize, cellsize: f64, nodata: f64, fill: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Empty);
        }
        check_cellsize(cellsize)?;
        Ok(Self {
            data: vec![fill; width * height],
            width,
            height,
            cellsize,
            nodata,
        })
    }

    /// Build a grid from row vectors, rejecting ragged or empty input.
    pub fn from_rows(rows: Vec<Vec<f64>>, cellsize: f64, nodata: f64) -> Result<Self> {
        check_cellsize(cellsize)?;
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(Error::Empty);
        }
        let height = rows.len();
        let mut data = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(Error::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            data,
            width,
            height,
            cellsize,
            nodata,
        })
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// Whether the signed position `(row, col)` lies inside the grid.
    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    pub fn is_nodata(&self, value: f64) -> bool {
        is_nodata(value, self.nodata)
    }

    /// Number of cells holding a real elevation.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| !self.is_nodata(v)).count()
    }

    /// Lowest real elevation, or `None` if every cell is nodata.
    pub fn min_elevation(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|&v| !self.is_nodata(v))
            .reduce(f64::min)
    }

    /// Highest real elevation, or `None` if every cell is nodata.
    pub fn max_elevation(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|&v| !self.is_nodata(v))
            .reduce(f64::max)
    }
}

fn check_cellsize(cellsize: f64) -> Result<()> {
    if cellsize.is_finite() && cellsize > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidCellsize(cellsize))
    }
}
