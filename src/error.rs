//! Error types shared by the loader, the summarizer and the map plotter.

use polars::prelude::PolarsError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarsError {
    #[error("file '{}' does not exist", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("Failed to decompress '{}': {source}", .path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse CSV '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("'{}' has no column {column}", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("'{}' has an invalid {column} value at row {row}", .path.display())]
    InvalidValue {
        path: PathBuf,
        column: &'static str,
        row: usize,
    },
    #[error("invalid STATE number: {state} (year {year})")]
    InvalidState { state: i64, year: i32 },
    #[error("Failed to render map: {0}")]
    Render(String),
    #[error("Failed to read config '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read boundaries '{}': {source}", .path.display())]
    Boundaries {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl FarsError {
    /// True for malformed or undecodable input files.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            FarsError::Decompress { .. }
                | FarsError::Parse { .. }
                | FarsError::MissingColumn { .. }
                | FarsError::InvalidValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FarsError>;
