//! 3×3 sampling window with replicate (Neumann) boundary handling.
//!
//! Out-of-grid samples copy the nearest in-grid value, found by clamping the
//! row and column offsets independently, so every window holds 9 values.
use serde::{Deserialize, Serialize};

use super::direction::DIRECTIONS;
use crate::heightfield::ElevationGrid;

/// Which grid boundary a cell touches.
///
/// Corners take precedence over sides. On single-row or single-column grids
/// a cell touches opposite sides at once; north wins over south and west
/// over east, so a 1-row grid tags its cells `NW`, `N`, `NE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeTag {
    Interior,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl EdgeTag {
    pub fn classify(row: usize, col: usize, nrows: usize, ncols: usize) -> Self {
        let north = row == 0;
        let south = !north && row + 1 == nrows;
        let west = col == 0;
        let east = !west && col + 1 == ncols;
        match (north, south, west, east) {
            (true, _, true, _) => EdgeTag::NW,
            (true, _, _, true) => EdgeTag::NE,
            (true, _, _, _) => EdgeTag::N,
            (_, true, true, _) => EdgeTag::SW,
            (_, true, _, true) => EdgeTag::SE,
            (_, true, _, _) => EdgeTag::S,
            (_, _, true, _) => EdgeTag::W,
            (_, _, _, true) => EdgeTag::E,
            _ => EdgeTag::Interior,
        }
    }
}

/// A 3×3 elevation sample centred on one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Samples indexed `[dy + 1][dx + 1]`; row 0 is the northern row.
    pub samples: [[f64; 3]; 3],
    pub edge: EdgeTag,
    pub cellsize: f64,
    /// Bit `i` is set when neighbour `i` was copied from an in-grid cell.
    replicated: u8,
}

impl Window {
    /// Sample the window around `(row, col)`.
    ///
    /// Caller must ensure `row < grid.height` and `col < grid.width`.
    pub fn build(grid: &ElevationGrid, row: usize, col: usize) -> Self {
        debug_assert!(row < grid.height && col < grid.width);
        let last_row = grid.height as isize - 1;
        let last_col = grid.width as isize - 1;

        let mut samples = [[0.0f64; 3]; 3];
        for (i, dy) in (-1isize..=1).enumerate() {
            for (j, dx) in (-1isize..=1).enumerate() {
                let r = (row as isize + dy).clamp(0, last_row) as usize;
                let c = (col as isize + dx).clamp(0, last_col) as usize;
                samples[i][j] = grid.get(r, c);
            }
        }

        let mut replicated = 0u8;
        for (i, dir) in DIRECTIONS.iter().enumerate() {
            if !grid.contains(row as isize + dir.dy, col as isize + dir.dx) {
                replicated |= 1 << i;
            }
        }

        Self {
            samples,
            edge: EdgeTag::classify(row, col, grid.height, grid.width),
            cellsize: grid.cellsize,
            replicated,
        }
    }

    #[inline]
    pub fn centre(&self) -> f64 {
        self.samples[1][1]
    }

    /// Neighbour `index` in direction-table order (East first, clockwise).
    #[inline]
    pub fn neighbour(&self, index: usize) -> f64 {
        let dir = &DIRECTIONS[index];
        self.samples[(dir.dy + 1) as usize][(dir.dx + 1) as usize]
    }

    /// All 8 neighbours: E, SE, S, SW, W, NW, N, NE.
    pub fn neighbours(&self) -> [f64; 8] {
        std::array::from_fn(|i| self.neighbour(i))
    }

    /// Whether neighbour `index` is a copy rather than a real adjacent cell.
    #[inline]
    pub fn is_replicated(&self, index: usize) -> bool {
        self.replicated & (1 << index) != 0
    }
}
