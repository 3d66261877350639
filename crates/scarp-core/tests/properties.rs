//! Property tests for the D8 pipeline on small random grids.
//!
//! Elevations are drawn from a handful of integer levels so that flats and
//! exact ties show up often.
use approx::assert_relative_eq;
use proptest::prelude::*;

use scarp_core::analysis::{evaluate, fill_sink, resolve_ties, CellStatus, EdgeTag, Window, DIRECTIONS};
use scarp_core::{compute_gradient, ElevationGrid, GradientGrid, GradientParams, TieReference};

const NODATA: f64 = -9999.0;

fn arb_grid() -> impl Strategy<Value = ElevationGrid> {
    (1usize..7, 1usize..7, prop::sample::select(vec![1.0, 2.5, 10.0])).prop_flat_map(
        |(width, height, cellsize)| {
            prop::collection::vec(0u8..8, width * height).prop_map(move |levels| {
                let rows = levels
                    .chunks(width)
                    .map(|row| {
                        row.iter()
                            .map(|&l| if l == 7 { NODATA } else { l as f64 })
                            .collect()
                    })
                    .collect();
                ElevationGrid::from_rows(rows, cellsize, NODATA).unwrap()
            })
        },
    )
}

fn arb_reference() -> impl Strategy<Value = TieReference> {
    prop_oneof![Just(TieReference::Downstream), Just(TieReference::Upstream)]
}

/// Window evaluation plus optional pit fill, without tie relaxation.
fn unrelaxed(dem: &ElevationGrid, fill: bool) -> GradientGrid {
    let mut cells = Vec::new();
    for row in 0..dem.height {
        for col in 0..dem.width {
            let window = Window::build(dem, row, col);
            let mut cell = evaluate(&window, NODATA);
            if fill {
                fill_sink(&mut cell, &window, NODATA);
            }
            cells.push(cell);
        }
    }
    GradientGrid {
        cells,
        width: dem.width,
        height: dem.height,
    }
}

fn params(fill_sinks: bool, tie_reference: TieReference) -> GradientParams {
    GradientParams {
        fill_sinks,
        tie_reference,
        ..GradientParams::default()
    }
}

proptest! {
    #[test]
    fn edge_tag_never_excludes_a_real_neighbour(dem in arb_grid()) {
        for row in 0..dem.height {
            for col in 0..dem.width {
                let window = Window::build(&dem, row, col);
                prop_assert_eq!(window.centre(), dem.get(row, col));
                for (index, dir) in DIRECTIONS.iter().enumerate() {
                    let on_grid = dem.contains(row as isize + dir.dy, col as isize + dir.dx);
                    prop_assert_eq!(window.is_replicated(index), !on_grid);
                    if on_grid {
                        prop_assert!(!dir.excludes(window.edge));
                    } else if dem.width > 1 && dem.height > 1 {
                        // Only degenerate grids rely on the replication mask.
                        prop_assert!(dir.excludes(window.edge));
                    }
                }
                let interior = window.edge == EdgeTag::Interior;
                prop_assert_eq!(interior, (0..8).all(|i| !window.is_replicated(i)));
            }
        }
    }

    #[test]
    fn steepest_descent_uses_real_neighbours_only(dem in arb_grid()) {
        for row in 0..dem.height {
            for col in 0..dem.width {
                let window = Window::build(&dem, row, col);
                let cell = evaluate(&window, NODATA);
                let centre = dem.get(row, col);
                if dem.is_nodata(centre) {
                    prop_assert_eq!(cell.status(), CellStatus::NoData);
                    continue;
                }

                let mut steepest = f64::NEG_INFINITY;
                let mut expected = Vec::new();
                for (index, dir) in DIRECTIONS.iter().enumerate() {
                    let (r, c) = (row as isize + dir.dy, col as isize + dir.dx);
                    if !dem.contains(r, c) {
                        continue;
                    }
                    let z = dem.get(r as usize, c as usize);
                    if dem.is_nodata(z) || z > centre {
                        continue;
                    }
                    let gradient = (centre - z) / dir.distance(dem.cellsize);
                    if gradient > steepest {
                        steepest = gradient;
                        expected.clear();
                        expected.push(index as u8);
                    } else if gradient == steepest {
                        expected.push(index as u8);
                    }
                }

                prop_assert_eq!(cell.slope, steepest);
                prop_assert_eq!(&cell.candidates, &expected);
                for &index in &cell.candidates {
                    prop_assert!(!window.is_replicated(index as usize));
                }
            }
        }
    }

    #[test]
    fn every_sloped_cell_ends_with_one_direction(
        dem in arb_grid(),
        fill in any::<bool>(),
        reference in arb_reference(),
    ) {
        let result = compute_gradient(&dem, &params(fill, reference));
        prop_assert_eq!(result.gradient.count(CellStatus::Ambiguous), 0);
        for cell in &result.gradient.cells {
            if cell.nodata {
                prop_assert!(cell.candidates.is_empty());
                prop_assert!(cell.aspect.is_nan());
            } else if cell.slope.is_finite() {
                let index = cell.direction();
                prop_assert!(index.is_some());
                prop_assert_eq!(cell.aspect, DIRECTIONS[index.unwrap()].bearing);
                prop_assert!(cell.slope >= 0.0);
            } else {
                prop_assert_eq!(cell.status(), CellStatus::UnresolvedPit);
            }
        }
    }

    #[test]
    fn relaxation_only_narrows_candidates(
        dem in arb_grid(),
        reference in arb_reference(),
    ) {
        let before = unrelaxed(&dem, true);
        let mut after = before.clone();
        let report = resolve_ties(&mut after, reference);

        let ambiguous = before.cells.iter().filter(|c| c.is_ambiguous()).count();
        prop_assert_eq!(report.resolved(), ambiguous);

        for (old, new) in before.cells.iter().zip(&after.cells) {
            prop_assert_eq!(old.slope.to_bits(), new.slope.to_bits());
            if old.is_ambiguous() {
                let chosen = new.candidates[0];
                prop_assert_eq!(new.candidates.len(), 1);
                prop_assert!(old.candidates.contains(&chosen));
            } else {
                prop_assert_eq!(&old.candidates, &new.candidates);
                prop_assert!(
                    old.aspect.to_bits() == new.aspect.to_bits(),
                    "settled cell was reopened"
                );
            }
        }
    }

    #[test]
    fn relaxation_is_idempotent(dem in arb_grid(), reference in arb_reference()) {
        let mut result = compute_gradient(&dem, &params(true, reference));
        let snapshot = result.gradient.clone();
        let report = resolve_ties(&mut result.gradient, reference);
        prop_assert_eq!(report.passes, 0);
        for (a, b) in snapshot.cells.iter().zip(&result.gradient.cells) {
            prop_assert_eq!(&a.candidates, &b.candidates);
        }
    }

    #[test]
    fn filled_cells_are_interior_and_flat(dem in arb_grid()) {
        let result = compute_gradient(&dem, &params(true, TieReference::Downstream));
        for row in 0..dem.height {
            for col in 0..dem.width {
                let cell = result.gradient.get(row, col);
                if cell.filled {
                    prop_assert_eq!(
                        EdgeTag::classify(row, col, dem.height, dem.width),
                        EdgeTag::Interior
                    );
                    prop_assert_eq!(cell.slope, 0.0);
                    prop_assert_eq!(cell.slope_degrees, 0.0);
                }
            }
        }
    }

    #[test]
    fn orthogonal_and_diagonal_slopes(
        drop in 0.5f64..50.0,
        cellsize in 0.5f64..30.0,
        diagonal in any::<bool>(),
    ) {
        // 3×3 plateau at `drop`, one neighbour of the centre at zero.
        let mut rows = vec![vec![drop * 2.0; 3]; 3];
        rows[1][1] = drop;
        if diagonal {
            rows[2][2] = 0.0;
        } else {
            rows[1][2] = 0.0;
        }
        let dem = ElevationGrid::from_rows(rows, cellsize, NODATA).unwrap();
        let cell = evaluate(&Window::build(&dem, 1, 1), NODATA);

        let run = if diagonal { cellsize * std::f64::consts::SQRT_2 } else { cellsize };
        assert_relative_eq!(cell.slope, drop / run, epsilon = 1e-12);
        assert_relative_eq!(cell.slope_percent, 100.0 * drop / run, epsilon = 1e-9);
        assert_relative_eq!(
            cell.slope_degrees,
            (drop / run).atan().to_degrees(),
            epsilon = 1e-9
        );
        prop_assert_eq!(cell.aspect, if diagonal { 135.0 } else { 90.0 });
    }
}

#[test]
fn centre_pit_fills_toward_first_lowest_neighbour() {
    let rows = vec![
        vec![5.0, 5.0, 5.0],
        vec![5.0, 1.0, 2.0],
        vec![5.0, 2.0, 5.0],
    ];
    let dem = ElevationGrid::from_rows(rows, 1.0, NODATA).unwrap();

    let filled = compute_gradient(&dem, &params(true, TieReference::Downstream));
    let centre = filled.gradient.get(1, 1);
    assert_eq!(centre.status(), CellStatus::Filled);
    assert_eq!(centre.candidates, vec![0]);
    assert_eq!(centre.aspect, 90.0);

    let open = compute_gradient(&dem, &params(false, TieReference::Downstream));
    assert_eq!(open.gradient.get(1, 1).status(), CellStatus::UnresolvedPit);
}

#[test]
fn single_row_flows_along_the_row() {
    let dem = ElevationGrid::from_rows(vec![vec![9.0, 7.0, 4.0, 0.0]], 1.0, NODATA).unwrap();
    let result = compute_gradient(&dem, &params(true, TieReference::Downstream));
    for col in 0..3 {
        let cell = result.gradient.get(0, col);
        assert_eq!(cell.direction(), Some(0), "col {col}");
        assert_eq!(cell.aspect, 90.0);
    }
    assert_eq!(result.gradient.get(0, 3).status(), CellStatus::UnresolvedPit);
}
