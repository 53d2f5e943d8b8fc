//! Serializable dashboard snapshot.

use crate::data::{LoadReport, Record};
use crate::stats::{ChartData, Dashboard, Kpis, Selection, SprintSummaryRow};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub selection: &'a Selection,
    pub load_report: &'a LoadReport,
    pub kpis: &'a Kpis,
    pub charts: &'a ChartData,
    pub sprint_summary: &'a [SprintSummaryRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<&'a [&'a Record]>,
}

impl<'a> DashboardView<'a> {
    pub fn new(
        dashboard: &'a Dashboard<'a>,
        selection: &'a Selection,
        load_report: &'a LoadReport,
        include_rows: bool,
    ) -> Self {
        Self {
            selection,
            load_report,
            kpis: &dashboard.kpis,
            charts: &dashboard.charts,
            sprint_summary: &dashboard.sprint_summary,
            rows: include_rows.then_some(dashboard.rows.as_slice()),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Table;
    use crate::stats::filter_and_aggregate;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn table() -> Table {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let record = Record {
            current_monthly_cost: 1000.0,
            cost_savings_amount: 200.0,
            achieved_savings: 200.0,
            ..Record::new("S1", d, d)
        };
        Table::new(vec![record], LoadReport::default())
    }

    #[test]
    fn rows_are_opt_in() {
        let table = table();
        let selection = Selection::all();
        let dashboard = filter_and_aggregate(&table, &selection);

        let without = DashboardView::new(&dashboard, &selection, table.report(), false);
        let value: Value = serde_json::from_str(&without.to_json_pretty().unwrap()).unwrap();
        assert!(value.get("rows").is_none());
        assert_eq!(value["kpis"]["total_recommendations"], 1);
        assert_eq!(value["selection"]["sprint"], "All");
        assert_eq!(value["charts"]["funnel"][0]["category"], "Initiated");
        assert_eq!(value["sprint_summary"][0]["achieved_count"], 1);

        let with = DashboardView::new(&dashboard, &selection, table.report(), true);
        let value: Value = serde_json::from_str(&with.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["rows"][0]["sprint"], "S1");
        assert_eq!(value["rows"][0]["fiscal_year"], 2025);
        assert_eq!(value["rows"][0]["quarter"], "Q1");
        assert_eq!(value["rows"][0]["start_date"], "2024-05-01");
    }
}
