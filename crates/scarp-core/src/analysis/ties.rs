//! Fixed-point relaxation of tied flow directions.
//!
//! A cell whose steepest descent is shared by several directions looks, for
//! each candidate in order, at one adjacent cell's current aspect. If that
//! aspect equals the candidate's bearing the candidate wins. If the adjacent
//! cell lies off the grid there is nothing to compare against and the
//! candidate wins outright. Passes scan row-major and update in place, so a
//! cell resolved early in a pass is visible to later cells in the same pass.
//! Passes repeat until one resolves nothing; any tie still open then keeps its
//! first candidate.
use serde::Serialize;
use tracing::{debug, warn};

use super::direction::{opposite, DIRECTIONS};
use crate::gradient::GradientGrid;
use crate::params::TieReference;

/// How the relaxation went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TieReport {
    /// Full grid scans, including the final scan that changed nothing.
    pub passes: usize,
    /// Ties settled because the examined cell was off the grid.
    pub by_boundary: usize,
    /// Ties settled by a matching neighbour aspect.
    pub by_neighbour: usize,
    /// Ties left open at the fixed point and defaulted to their first candidate.
    pub defaulted: usize,
}

impl TieReport {
    pub fn resolved(&self) -> usize {
        self.by_boundary + self.by_neighbour + self.defaulted
    }
}

/// Offset of the cell examined for candidate direction `index`.
fn examined_offset(reference: TieReference, index: usize) -> (isize, isize) {
    let dir = match reference {
        TieReference::Downstream => &DIRECTIONS[index],
        TieReference::Upstream => &DIRECTIONS[opposite(index)],
    };
    (dir.dy, dir.dx)
}

/// Relax every ambiguous cell of `grid` to a single direction.
pub fn resolve_ties(grid: &mut GradientGrid, reference: TieReference) -> TieReport {
    let mut report = TieReport::default();
    if !grid.cells.iter().any(|cell| cell.is_ambiguous()) {
        return report;
    }

    loop {
        report.passes += 1;
        let resolved = relaxation_pass(grid, reference, &mut report);
        debug!(pass = report.passes, resolved, "tie relaxation pass");
        if resolved == 0 {
            break;
        }
    }

    for cell in grid.cells.iter_mut().filter(|cell| cell.is_ambiguous()) {
        let first = cell.candidates[0] as usize;
        cell.settle_on(first);
        report.defaulted += 1;
    }
    if report.defaulted > 0 {
        warn!(
            cells = report.defaulted,
            "ties left after convergence; defaulted to first candidate"
        );
    }

    report
}

/// One row-major scan. Returns the number of cells resolved.
fn relaxation_pass(grid: &mut GradientGrid, reference: TieReference, report: &mut TieReport) -> usize {
    let mut resolved = 0;
    for row in 0..grid.height {
        for col in 0..grid.width {
            let idx = row * grid.width + col;
            if !grid.cells[idx].is_ambiguous() {
                continue;
            }

            let candidates = grid.cells[idx].candidates.clone();
            for &candidate in &candidates {
                let index = candidate as usize;
                let (dy, dx) = examined_offset(reference, index);
                let (r, c) = (row as isize + dy, col as isize + dx);

                if !grid.contains(r, c) {
                    grid.cells[idx].settle_on(index);
                    report.by_boundary += 1;
                    resolved += 1;
                    break;
                }
                if grid.get(r as usize, c as usize).aspect == DIRECTIONS[index].bearing {
                    grid.cells[idx].settle_on(index);
                    report.by_neighbour += 1;
                    resolved += 1;
                    break;
                }
            }
        }
    }
    resolved
}
