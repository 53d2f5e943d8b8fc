//! Sprint summary export through Polars.

use crate::error::DashboardResult;
use crate::stats::SprintSummaryRow;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Build the sprint summary table as a DataFrame.
pub fn summary_frame(rows: &[SprintSummaryRow]) -> PolarsResult<DataFrame> {
    fn amounts(rows: &[SprintSummaryRow], f: impl Fn(&SprintSummaryRow) -> f64) -> Vec<f64> {
        rows.iter().map(f).collect()
    }
    fn counts(rows: &[SprintSummaryRow], f: impl Fn(&SprintSummaryRow) -> usize) -> Vec<u64> {
        rows.iter().map(|r| f(r) as u64).collect()
    }

    let sprints: Vec<String> = rows.iter().map(|r| r.sprint.clone()).collect();
    DataFrame::new(vec![
        Column::new("Sprint".into(), sprints),
        Column::new("Total_Recommendations".into(), counts(rows, |r| r.recommendations)),
        Column::new("Current_Spend_USD".into(), amounts(rows, |r| r.current_spend)),
        Column::new("Est_Spend_USD".into(), amounts(rows, |r| r.est_spend)),
        Column::new("Total_Savings_USD".into(), amounts(rows, |r| r.total_savings)),
        Column::new("Total_Savings_Pct".into(), amounts(rows, |r| r.savings_percent)),
        Column::new("Achieved_USD".into(), amounts(rows, |r| r.achieved_amount)),
        Column::new("Unachievable_USD".into(), amounts(rows, |r| r.unachievable_amount)),
        Column::new("Delayed_USD".into(), amounts(rows, |r| r.delayed_amount)),
        Column::new("Initiated_USD".into(), amounts(rows, |r| r.initiated_amount)),
        Column::new("Achieved_Count".into(), counts(rows, |r| r.achieved_count)),
        Column::new("Unachievable_Count".into(), counts(rows, |r| r.unachievable_count)),
        Column::new("Delayed_Count".into(), counts(rows, |r| r.delayed_count)),
        Column::new("Initiated_Count".into(), counts(rows, |r| r.initiated_count)),
    ])
}

/// Write the sprint summary as CSV with a header row.
pub fn write_sprint_summary_csv(rows: &[SprintSummaryRow], path: &Path) -> DashboardResult<()> {
    let mut df = summary_frame(rows)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    info!(path = %path.display(), sprints = rows.len(), "wrote sprint summary");
    Ok(())
}
