use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::georef::MapReference;

/// Which slope layers to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeMap {
    Percent,
    Degrees,
    Both,
}

impl SlopeMap {
    pub fn percent(self) -> bool {
        matches!(self, SlopeMap::Percent | SlopeMap::Both)
    }

    pub fn degrees(self) -> bool {
        matches!(self, SlopeMap::Degrees | SlopeMap::Both)
    }
}

/// Which adjacent cell a tied direction is checked against during relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieReference {
    /// The cell the direction points at.
    Downstream,
    /// The cell on the opposite side, which would flow straight through.
    Upstream,
}

/// Resolved run configuration for one gradient analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientParams {
    /// Flatten interior pits to their lowest neighbour.
    pub fill_sinks: bool,
    pub slope_map: SlopeMap,
    pub aspect_map: bool,
    pub tie_reference: TieReference,
    /// Lower-left map reference of the grid.
    pub reference: MapReference,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            fill_sinks: true,
            slope_map: SlopeMap::Degrees,
            aspect_map: true,
            tie_reference: TieReference::Downstream,
            reference: MapReference::default(),
        }
    }
}

impl GradientParams {
    /// Load params from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("x_ref", self.reference.x_ref), ("y_ref", self.reference.y_ref)] {
            if !value.is_finite() {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "must be a finite coordinate in metres".into(),
                });
            }
        }
        Ok(())
    }
}
