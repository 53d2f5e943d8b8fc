//! Data module - spreadsheet loading, schema resolution and normalization

pub mod dates;
pub mod fiscal;
mod loader;
mod normalizer;
pub mod record;
pub mod schema;

pub use fiscal::{fiscal_year, Quarter};
pub use loader::{DataLoader, Source, SourceFormat};
pub use normalizer::Normalizer;
pub use record::{LoadReport, Record, SavingsCategory, Table};
pub use schema::{LogicalColumn, ResolvedSchema};

use crate::error::DashboardResult;
use chrono::{Local, NaiveDate};
use tracing::info;

/// Load and normalize `source`, substituting today's date for unusable dates.
pub fn load(source: &Source) -> DashboardResult<Table> {
    load_with_today(source, Local::now().date_naive())
}

/// Load and normalize `source` with an explicit substitute date.
pub fn load_with_today(source: &Source, today: NaiveDate) -> DashboardResult<Table> {
    let raw = DataLoader::read_raw(source)?;
    let table = Normalizer::normalize(&raw, source.format()?, today)?;
    info!(
        source = %source.describe(),
        rows = table.len(),
        "loaded recommendations"
    );
    Ok(table)
}
