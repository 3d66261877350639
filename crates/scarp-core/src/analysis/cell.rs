use serde::Serialize;

use super::direction::DIRECTIONS;

/// Terminal or intermediate state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Centre value is the nodata sentinel.
    NoData,
    /// No downhill neighbour and the cell was not filled.
    UnresolvedPit,
    /// More than one direction ties for the steepest descent.
    Ambiguous,
    /// Exactly one steepest direction.
    Resolved,
    /// Pit flattened to its lowest neighbour.
    Filled,
}

/// Slope and aspect of one grid cell.
///
/// `slope` is rise over run; `-inf` means no downhill direction has been found.
/// The derived percent/degree values and `aspect` are NaN until a direction is
/// chosen.
#[derive(Debug, Clone, Serialize)]
pub struct CellResult {
    pub slope: f64,
    pub slope_percent: f64,
    pub slope_degrees: f64,
    /// Compass bearing of the chosen direction, degrees clockwise from North.
    pub aspect: f64,
    /// Direction-table indices tied for the steepest slope, in scan order.
    pub candidates: Vec<u8>,
    pub nodata: bool,
    pub filled: bool,
}

impl CellResult {
    /// A cell with no direction found yet.
    pub fn unresolved() -> Self {
        Self {
            slope: f64::NEG_INFINITY,
            slope_percent: f64::NAN,
            slope_degrees: f64::NAN,
            aspect: f64::NAN,
            candidates: Vec::new(),
            nodata: false,
            filled: false,
        }
    }

    pub fn no_data() -> Self {
        Self {
            nodata: true,
            ..Self::unresolved()
        }
    }

    /// Set the rise/run slope and derive percent and degrees from it.
    pub fn set_slope(&mut self, slope: f64) {
        self.slope = slope;
        if slope.is_finite() {
            self.slope_percent = slope * 100.0;
            self.slope_degrees = slope.atan() * 180.0 / std::f64::consts::PI;
        } else {
            self.slope_percent = f64::NAN;
            self.slope_degrees = f64::NAN;
        }
    }

    /// Collapse the candidates to `index` and take its bearing as the aspect.
    pub fn settle_on(&mut self, index: usize) {
        self.candidates.clear();
        self.candidates.push(index as u8);
        self.aspect = DIRECTIONS[index].bearing;
    }

    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// The chosen direction once exactly one candidate remains.
    pub fn direction(&self) -> Option<usize> {
        match self.candidates.as_slice() {
            [only] => Some(*only as usize),
            _ => None,
        }
    }

    pub fn status(&self) -> CellStatus {
        if self.nodata {
            CellStatus::NoData
        } else if self.slope == f64::NEG_INFINITY {
            CellStatus::UnresolvedPit
        } else if self.is_ambiguous() {
            CellStatus::Ambiguous
        } else if self.filled {
            CellStatus::Filled
        } else {
            CellStatus::Resolved
        }
    }
}
