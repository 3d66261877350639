//! D8 steepest-descent search over one window.
use super::cell::CellResult;
use super::direction::DIRECTIONS;
use super::window::Window;
use crate::heightfield::is_nodata;

/// Find the steepest downhill direction(s) out of the window centre.
///
/// Neighbours are scanned East first, clockwise. A neighbour is skipped when
/// it is nodata, replicated (excluded for the window's edge tag, or copied on
/// a degenerate grid), or higher than the centre. Flat neighbours count as a
/// zero gradient, so they only win when nothing strictly lower exists.
/// Exactly equal gradients are all kept as candidates in scan order.
///
/// A nodata centre returns the sentinel result immediately.
pub fn evaluate(window: &Window, nodata: f64) -> CellResult {
    let centre = window.centre();
    if is_nodata(centre, nodata) {
        return CellResult::no_data();
    }

    let mut result = CellResult::unresolved();
    let mut steepest = f64::NEG_INFINITY;

    for (index, dir) in DIRECTIONS.iter().enumerate() {
        let neighbour = window.neighbour(index);
        if is_nodata(neighbour, nodata) {
            continue;
        }
        if dir.excludes(window.edge) || window.is_replicated(index) {
            continue;
        }
        let drop = centre - neighbour;
        if drop < 0.0 {
            continue;
        }

        let gradient = drop / dir.distance(window.cellsize);
        if gradient > steepest {
            steepest = gradient;
            result.candidates.clear();
            result.candidates.push(index as u8);
            result.aspect = dir.bearing;
        } else if gradient == steepest {
            result.candidates.push(index as u8);
        }
    }

    result.set_slope(steepest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::ElevationGrid;
    use approx::assert_relative_eq;

    const NODATA: f64 = -9999.0;

    fn eval_at(rows: Vec<Vec<f64>>, cellsize: f64, row: usize, col: usize) -> CellResult {
        let grid = ElevationGrid::from_rows(rows, cellsize, NODATA).unwrap();
        evaluate(&Window::build(&grid, row, col), NODATA)
    }

    #[test]
    fn orthogonal_slope_is_drop_over_cellsize() {
        let cell = eval_at(
            vec![vec![50.0, 50.0, 50.0], vec![50.0, 50.0, 44.0], vec![50.0, 50.0, 50.0]],
            2.0,
            1,
            1,
        );
        assert_eq!(cell.candidates, vec![0]);
        assert_eq!(cell.slope, (50.0 - 44.0) / 2.0);
        assert_eq!(cell.aspect, 90.0);
        assert_relative_eq!(cell.slope_percent, 300.0);
    }

    #[test]
    fn diagonal_slope_uses_sqrt_two_distance() {
        let cell = eval_at(
            vec![vec![50.0, 50.0, 50.0], vec![50.0, 50.0, 50.0], vec![41.0, 50.0, 50.0]],
            3.0,
            1,
            1,
        );
        assert_eq!(cell.candidates, vec![3]);
        assert_eq!(cell.slope, (50.0 - 41.0) / (3.0 * std::f64::consts::SQRT_2));
        assert_eq!(cell.aspect, 225.0);
        assert_relative_eq!(cell.slope_degrees, cell.slope.atan().to_degrees(), epsilon = 1e-12);
    }

    #[test]
    fn ties_kept_in_scan_order() {
        // South and North drop by the same amount; West is shallower.
        let cell = eval_at(
            vec![vec![90.0, 80.0, 90.0], vec![95.0, 100.0, 120.0], vec![110.0, 80.0, 110.0]],
            10.0,
            1,
            1,
        );
        assert_eq!(cell.candidates, vec![2, 6]);
        assert_eq!(cell.aspect, 180.0);
        assert_eq!(cell.slope, 2.0);
    }

    #[test]
    fn strict_pit_has_no_direction() {
        let cell = eval_at(
            vec![vec![10.0, 10.0, 10.0], vec![10.0, 5.0, 10.0], vec![10.0, 10.0, 10.0]],
            10.0,
            1,
            1,
        );
        assert_eq!(cell.slope, f64::NEG_INFINITY);
        assert!(cell.candidates.is_empty());
        assert!(cell.slope_percent.is_nan());
        assert!(cell.slope_degrees.is_nan());
        assert!(cell.aspect.is_nan());
    }

    #[test]
    fn flat_neighbours_lose_to_real_drop() {
        let cell = eval_at(
            vec![vec![5.0, 5.0, 5.0], vec![5.0, 5.0, 5.0], vec![5.0, 4.0, 5.0]],
            1.0,
            1,
            1,
        );
        assert_eq!(cell.candidates, vec![2]);
        assert_eq!(cell.slope, 1.0);
    }

    #[test]
    fn flat_plateau_ties_every_direction() {
        let cell = eval_at(vec![vec![5.0; 3]; 3], 1.0, 1, 1);
        assert_eq!(cell.slope, 0.0);
        assert_eq!(cell.candidates, (0..8).collect::<Vec<u8>>());
        assert_eq!(cell.aspect, 90.0);
    }

    #[test]
    fn nodata_centre_is_sentinel_regardless_of_neighbours() {
        let cell = eval_at(
            vec![vec![100.0, 100.0, 100.0], vec![100.0, NODATA, 1.0], vec![100.0, 100.0, 100.0]],
            1.0,
            1,
            1,
        );
        assert!(cell.nodata);
        assert_eq!(cell.slope, f64::NEG_INFINITY);
        assert!(cell.candidates.is_empty());
        assert!(cell.aspect.is_nan());
    }

    #[test]
    fn nodata_neighbour_never_chosen() {
        let cell = eval_at(
            vec![vec![10.0, 10.0, 10.0], vec![10.0, 10.0, NODATA], vec![10.0, 9.0, 10.0]],
            1.0,
            1,
            1,
        );
        assert_eq!(cell.candidates, vec![2]);
    }

    #[test]
    fn single_row_middle_flows_east() {
        let grid = ElevationGrid::from_rows(vec![vec![30.0, 20.0, 10.0]], 5.0, NODATA).unwrap();
        let w = Window::build(&grid, 0, 1);
        assert_eq!(w.edge, crate::analysis::EdgeTag::N);
        let cell = evaluate(&w, NODATA);
        assert_eq!(cell.slope, 2.0);
        assert_eq!(cell.candidates, vec![0]);
        assert_eq!(cell.aspect, 90.0);
    }

    #[test]
    fn edge_cell_ignores_replicated_side() {
        // West edge: the replicated W/NW/SW copies equal the centre and must
        // not tie with the real flat neighbours.
        let cell = eval_at(
            vec![vec![7.0, 9.0], vec![7.0, 9.0], vec![7.0, 9.0]],
            1.0,
            1,
            0,
        );
        assert_eq!(cell.candidates, vec![2, 6]);
        assert_eq!(cell.slope, 0.0);
    }
}
