//! Static D8 direction table, indexed clockwise from East.
//!
//! ```text
//!   5  6  7        NW  N  NE
//!   4  *  0        W   *  E
//!   3  2  1        SW  S  SE
//! ```
use super::window::EdgeTag;
use EdgeTag::{E, N, NE, NW, S, SE, SW, W};

/// One of the eight compass neighbours.
#[derive(Debug)]
pub struct Direction {
    /// Row offset; negative is north.
    pub dy: isize,
    /// Column offset; positive is east.
    pub dx: isize,
    /// Compass bearing in degrees, used as the aspect when this direction wins.
    pub bearing: f64,
    /// Edge tags under which this neighbour is a replicated sample.
    pub excluded_on: &'static [EdgeTag],
}

pub const DIRECTIONS: [Direction; 8] = [
    Direction { dy: 0, dx: 1, bearing: 90.0, excluded_on: &[NE, E, SE] },
    Direction { dy: 1, dx: 1, bearing: 135.0, excluded_on: &[NE, E, SE, S, SW] },
    Direction { dy: 1, dx: 0, bearing: 180.0, excluded_on: &[SW, S, SE] },
    Direction { dy: 1, dx: -1, bearing: 225.0, excluded_on: &[NW, W, SW, S, SE] },
    Direction { dy: 0, dx: -1, bearing: 270.0, excluded_on: &[NW, W, SW] },
    Direction { dy: -1, dx: -1, bearing: 315.0, excluded_on: &[SW, W, NW, N, NE] },
    Direction { dy: -1, dx: 0, bearing: 0.0, excluded_on: &[NW, N, NE] },
    Direction { dy: -1, dx: 1, bearing: 45.0, excluded_on: &[NW, N, NE, E, SE] },
];

impl Direction {
    /// Odd table indices are diagonal.
    #[inline]
    pub fn is_diagonal(&self) -> bool {
        self.dy != 0 && self.dx != 0
    }

    /// Centre-to-centre distance to this neighbour.
    #[inline]
    pub fn distance(&self, cellsize: f64) -> f64 {
        if self.is_diagonal() {
            cellsize * std::f64::consts::SQRT_2
        } else {
            cellsize
        }
    }

    #[inline]
    pub fn excludes(&self, edge: EdgeTag) -> bool {
        self.excluded_on.contains(&edge)
    }
}

/// Table index of the direction pointing the opposite way.
#[inline]
pub fn opposite(index: usize) -> usize {
    (index + 4) % 8
}
