//! Error types shared by the loader, normalizer and report writers.

use polars::prelude::PolarsError;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Header problems found while resolving the required columns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column '{column}' matches more than one header: {}", .candidates.join(", "))]
    AmbiguousColumn {
        column: String,
        candidates: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    #[error("Failed to read table: {0}")]
    Polars(#[from] PolarsError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Source has no header row")]
    EmptySource,
}

impl From<calamine::Error> for DashboardError {
    fn from(err: calamine::Error) -> Self {
        DashboardError::Workbook(err.to_string())
    }
}
