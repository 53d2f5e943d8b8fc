//! Plain-text dashboard for the terminal.

use crate::report::{money, percent};
use crate::stats::{Dashboard, Selection};
use std::fmt;

const BAR_WIDTH: usize = 30;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

fn sprint_name(sprint: &str) -> &str {
    if sprint.is_empty() {
        "(none)"
    } else {
        sprint
    }
}

/// Terminal rendering of a dashboard under a selection.
pub struct TextReport<'a, 'b> {
    pub dashboard: &'a Dashboard<'b>,
    pub selection: &'a Selection,
}

/// Render KPIs, charts as bar lists, and the sprint summary table.
pub fn render(dashboard: &Dashboard<'_>, selection: &Selection) -> String {
    TextReport {
        dashboard,
        selection,
    }
    .to_string()
}

impl fmt::Display for TextReport<'_, '_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.dashboard;
        let selection = self.selection;
        let kpis = &dashboard.kpis;

        writeln!(out, "Cost Optimization Dashboard")?;
        writeln!(
            out,
            "Filters: Month={} Year={} FY={} Sprint={}",
            selection.month, selection.year, selection.fiscal_year, selection.sprint
        )?;
        writeln!(out)?;
        writeln!(out, "Total Recommendations   {}", kpis.total_recommendations)?;
        writeln!(out, "Total Savings ($)       {}", money(kpis.total_savings_amount, false))?;
        writeln!(out, "Total Savings (%)       {}", percent(kpis.total_savings_percent))?;
        writeln!(
            out,
            "Avg Savings / Rec ($)   {}",
            money(kpis.avg_savings_per_recommendation, false)
        )?;

        writeln!(out, "\nSavings Pipeline (Funnel)")?;
        let max = dashboard
            .charts
            .funnel
            .iter()
            .map(|s| s.value)
            .fold(0.0, f64::max);
        for stage in &dashboard.charts.funnel {
            writeln!(
                out,
                "  {:<22} {:>12}  {}",
                stage.label,
                money(stage.value, false),
                bar(stage.value, max)
            )?;
        }

        writeln!(out, "\nSavings by Inference Type ($)")?;
        if dashboard.charts.by_inference_type.is_empty() {
            writeln!(out, "  No data for selected filters.")?;
        }
        let max = dashboard
            .charts
            .by_inference_type
            .iter()
            .map(|c| c.value)
            .fold(0.0, f64::max);
        for item in &dashboard.charts.by_inference_type {
            writeln!(
                out,
                "  {:<22} {:>12}  {}",
                sprint_name(&item.name),
                money(item.value, false),
                bar(item.value, max)
            )?;
        }

        writeln!(out, "\nSavings Mix ($)")?;
        for slice in &dashboard.charts.savings_mix {
            writeln!(
                out,
                "  {:<22} {:>12}  {:>6}",
                slice.label,
                money(slice.value, false),
                percent(slice.share * 100.0)
            )?;
        }

        writeln!(out, "\nRecommendations by Sprint & Savings ($)")?;
        let series = &dashboard.charts.by_sprint;
        if series.sprints.is_empty() {
            writeln!(out, "  No data for selected filters.")?;
        }
        for ((sprint, count), savings) in series
            .sprints
            .iter()
            .zip(&series.recommendations)
            .zip(&series.savings)
        {
            writeln!(
                out,
                "  {:<22} {:>6} recs {:>12}",
                sprint_name(sprint),
                count,
                money(*savings, false)
            )?;
        }

        writeln!(out, "\nSprint Summary – Savings & Counts")?;
        if dashboard.sprint_summary.is_empty() {
            return writeln!(out, "  No rows in current filter.");
        }
        writeln!(
            out,
            "  {:<14} {:>5} {:>12} {:>12} {:>7} {:>9} {:>8} {:>8} {:>9}",
            "Sprint", "Recs", "Spend", "Savings", "Sav %", "Initiated", "Delayed", "Unach.", "Achieved"
        )?;
        for row in &dashboard.sprint_summary {
            writeln!(
                out,
                "  {:<14} {:>5} {:>12} {:>12} {:>7} {:>9} {:>8} {:>8} {:>9}",
                sprint_name(&row.sprint),
                row.recommendations,
                money(row.current_spend, true),
                money(row.total_savings, true),
                percent(row.savings_percent),
                row.initiated_count,
                row.delayed_count,
                row.unachievable_count,
                row.achieved_count
            )?;
        }
        writeln!(
            out,
            "\nFY: Apr 1 to Mar 31 (end-year label, e.g., Apr 2024–Mar 2025 = FY2025). \
             Q1=Apr–Jun, Q2=Jul–Sep, Q3=Oct–Dec, Q4=Jan–Mar."
        )
    }
}
