//! Dashboard session: the currently loaded table and the current selection.

use crate::data::{self, Source, Table};
use crate::error::DashboardResult;
use crate::stats::{filter_and_aggregate, filter_options, Dashboard, FilterOptions, Selection};
use chrono::NaiveDate;
use tracing::warn;

#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
    selection: Selection,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded table.
    pub fn with_table(table: Table) -> Self {
        Self {
            table: Some(table),
            selection: Selection::default(),
        }
    }

    /// Load `source`, replacing the current table on success.
    ///
    /// On failure the previous table (if any) stays in place.
    pub fn load(&mut self, source: &Source) -> DashboardResult<&Table> {
        let result = data::load(source);
        self.install(source, result)
    }

    /// Same as [`Session::load`] with an explicit substitute date.
    pub fn load_with_today(
        &mut self,
        source: &Source,
        today: NaiveDate,
    ) -> DashboardResult<&Table> {
        let result = data::load_with_today(source, today);
        self.install(source, result)
    }

    fn install(
        &mut self,
        source: &Source,
        result: DashboardResult<Table>,
    ) -> DashboardResult<&Table> {
        match result {
            Ok(table) => Ok(&*self.table.insert(table)),
            Err(err) => {
                warn!(
                    source = %source.describe(),
                    error = %err,
                    kept_previous = self.table.is_some(),
                    "load failed"
                );
                Err(err)
            }
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn options(&self) -> Option<FilterOptions> {
        self.table.as_ref().map(filter_options)
    }

    /// Aggregates for the current selection, if a table is loaded.
    pub fn dashboard(&self) -> Option<Dashboard<'_>> {
        self.table
            .as_ref()
            .map(|table| filter_and_aggregate(table, &self.selection))
    }
}
