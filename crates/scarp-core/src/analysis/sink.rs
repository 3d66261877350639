//! Flat fill for interior pits.
use super::cell::CellResult;
use super::window::{EdgeTag, Window};
use crate::heightfield::is_nodata;

/// Fill an unresolved interior pit to the height of its lowest neighbour.
///
/// The slope becomes 0 and the single candidate is the lowest real neighbour
/// (first in scan order on ties). Boundary cells, nodata cells, cells that
/// already have a direction and cells with no real neighbour are left
/// untouched. Returns whether the cell was filled.
pub fn fill_sink(cell: &mut CellResult, window: &Window, nodata: f64) -> bool {
    if cell.nodata || cell.slope != f64::NEG_INFINITY || window.edge != EdgeTag::Interior {
        return false;
    }

    let mut lowest: Option<(usize, f64)> = None;
    for (index, value) in window.neighbours().into_iter().enumerate() {
        if is_nodata(value, nodata) {
            continue;
        }
        if lowest.map_or(true, |(_, min)| value < min) {
            lowest = Some((index, value));
        }
    }

    let Some((index, _)) = lowest else {
        return false;
    };
    cell.set_slope(0.0);
    cell.settle_on(index);
    cell.filled = true;
    true
}
