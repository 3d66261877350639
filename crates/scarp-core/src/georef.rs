//! Cartesian map reference of a grid's lower-left corner and the extent it
//! spans, reported by `scarp info`, `summary.json` and the map renderer.
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

/// Lower-left corner of the grid in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapReference {
    /// Easting of the left edge.
    pub x_ref: f64,
    /// Northing of the bottom edge.
    pub y_ref: f64,
    pub hemisphere: Hemisphere,
}

impl Default for MapReference {
    fn default() -> Self {
        Self {
            x_ref: 0.0,
            y_ref: 0.0,
            hemisphere: Hemisphere::North,
        }
    }
}

/// A distance from the equator with its hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Northing {
    pub metres: f64,
    pub hemisphere: Hemisphere,
}

impl fmt::Display for Northing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} m", self.metres, self.hemisphere.letter())
    }
}

/// Edges of the mapped area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapExtent {
    pub west: f64,
    pub east: f64,
    pub south: Northing,
    pub north: Northing,
}

impl MapExtent {
    /// `(left, right)` axis labels.
    pub fn x_labels(&self) -> (String, String) {
        (format!("{}E {}", self.west, self.south), format!("{}E m", self.east))
    }

    pub fn top_label(&self) -> String {
        self.north.to_string()
    }
}

impl MapReference {
    /// Extent of a grid of `nrows × ncols` cells anchored at this reference.
    ///
    /// In the southern hemisphere the top edge crosses into the north when
    /// the grid spans more than `y_ref`.
    pub fn extent(&self, nrows: usize, ncols: usize, cellsize: f64) -> MapExtent {
        let span_x = cellsize * ncols as f64;
        let span_y = cellsize * nrows as f64;
        let south = Northing {
            metres: self.y_ref,
            hemisphere: self.hemisphere,
        };
        let north = match self.hemisphere {
            Hemisphere::North => Northing {
                metres: self.y_ref + span_y,
                hemisphere: Hemisphere::North,
            },
            Hemisphere::South if self.y_ref < span_y => Northing {
                metres: span_y - self.y_ref,
                hemisphere: Hemisphere::North,
            },
            Hemisphere::South => Northing {
                metres: self.y_ref - span_y,
                hemisphere: Hemisphere::South,
            },
        };
        MapExtent {
            west: self.x_ref,
            east: self.x_ref + span_x,
            south,
            north,
        }
    }
}
