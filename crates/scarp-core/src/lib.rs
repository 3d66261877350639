//! D8 slope and aspect analysis for gridded elevation models.
//!
//! The pipeline builds a 3×3 window around every cell, picks the steepest
//! downhill D8 direction, optionally fills pits, then relaxes tied
//! directions against neighbouring aspects until nothing changes.
pub mod analysis;
pub mod error;
pub mod export;
pub mod georef;
pub mod gradient;
pub mod heightfield;
pub mod params;
pub mod surface;

pub use error::{Error, Result};
pub use gradient::{compute_gradient, GradientGrid, GradientResult};
pub use heightfield::ElevationGrid;
pub use params::{GradientParams, SlopeMap, TieReference};
