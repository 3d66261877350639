//! Error types for raster ingestion, parameters and export.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster data on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Inconsistent row length: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Raster contains no cells")]
    Empty,

    #[error("Header declares {nrows}x{ncols} cells but {found} were read")]
    CellCountMismatch {
        nrows: usize,
        ncols: usize,
        found: usize,
    },

    #[error("Invalid cellsize {0}: must be positive and finite")]
    InvalidCellsize(f64),

    #[error("Cellsize missing from raster header and not supplied")]
    MissingCellsize,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for scarp operations.
pub type Result<T> = std::result::Result<T, Error>;
