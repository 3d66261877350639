//! Gradient pipeline: window → steepest descent → pit fill → tie relaxation.
use serde::Serialize;
use tracing::info;

use crate::analysis::{evaluate, fill_sink, resolve_ties, CellResult, CellStatus, TieReport, Window};
use crate::heightfield::ElevationGrid;
use crate::params::GradientParams;

/// Per-cell slope/aspect results, index-aligned with the elevation grid.
#[derive(Debug, Clone, Serialize)]
pub struct GradientGrid {
    /// Row-major cells.
    pub cells: Vec<CellResult>,
    pub width: usize,
    pub height: usize,
}

impl GradientGrid {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &CellResult {
        &self.cells[row * self.width + col]
    }

    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Rows in north-to-south order.
    pub fn rows(&self) -> impl Iterator<Item = &[CellResult]> {
        self.cells.chunks(self.width)
    }

    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|cell| cell.status() == status).count()
    }
}

/// Output of one gradient analysis.
pub struct GradientResult {
    pub gradient: GradientGrid,
    pub ties: TieReport,
}

/// Run the full slope/aspect analysis over `grid`.
///
/// Steps:
/// 1. Build the 3×3 window of every cell and run the steepest-descent search.
/// 2. If `fill_sinks` is set, flatten interior pits to their lowest neighbour.
/// 3. Relax tied directions across the grid until nothing changes.
pub fn compute_gradient(grid: &ElevationGrid, params: &GradientParams) -> GradientResult {
    let mut cells = Vec::with_capacity(grid.width * grid.height);

    for row in 0..grid.height {
        for col in 0..grid.width {
            let window = Window::build(grid, row, col);
            let mut cell = evaluate(&window, grid.nodata);
            if params.fill_sinks {
                fill_sink(&mut cell, &window, grid.nodata);
            }
            cells.push(cell);
        }
    }

    let mut gradient = GradientGrid {
        cells,
        width: grid.width,
        height: grid.height,
    };
    let ties = resolve_ties(&mut gradient, params.tie_reference);

    info!(
        width = grid.width,
        height = grid.height,
        passes = ties.passes,
        filled = gradient.count(CellStatus::Filled),
        pits = gradient.count(CellStatus::UnresolvedPit),
        nodata = gradient.count(CellStatus::NoData),
        "gradient computed"
    );

    GradientResult { gradient, ties }
}
