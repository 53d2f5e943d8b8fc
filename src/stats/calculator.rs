//! Savings Calculator Module
//! KPI, chart grouping and sprint summary aggregation over a filtered table.

use crate::data::{Record, SavingsCategory, Table};
use crate::stats::filter::Selection;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Headline figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_recommendations: usize,
    pub total_savings_amount: f64,
    /// Σ savings / Σ current cost, in percent.
    pub total_savings_percent: f64,
    pub avg_savings_per_recommendation: f64,
    pub total_current_cost: f64,
    pub total_est_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub category: SavingsCategory,
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: f64,
}

/// Parallel per-sprint series sharing one sprint ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SprintSeries {
    pub sprints: Vec<String>,
    pub recommendations: Vec<usize>,
    pub savings: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixSlice {
    pub category: SavingsCategory,
    pub label: &'static str,
    pub value: f64,
    /// Fraction of the four-category total, 0..=1.
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub funnel: Vec<FunnelStage>,
    pub by_inference_type: Vec<CategoryValue>,
    pub by_sprint: SprintSeries,
    pub savings_mix: Vec<MixSlice>,
}

/// One row of the sprint summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SprintSummaryRow {
    pub sprint: String,
    pub recommendations: usize,
    pub current_spend: f64,
    pub est_spend: f64,
    pub total_savings: f64,
    pub savings_percent: f64,
    pub achieved_amount: f64,
    pub unachievable_amount: f64,
    pub delayed_amount: f64,
    pub initiated_amount: f64,
    pub achieved_count: usize,
    pub unachievable_count: usize,
    pub delayed_count: usize,
    pub initiated_count: usize,
}

impl SprintSummaryRow {
    fn new(sprint: &str) -> Self {
        Self {
            sprint: sprint.to_string(),
            ..Self::default()
        }
    }

    fn add(&mut self, record: &Record) {
        self.recommendations += 1;
        self.current_spend += record.current_monthly_cost;
        self.est_spend += record.est_monthly_cost;
        self.total_savings += record.cost_savings_amount;
        self.achieved_amount += record.achieved_savings;
        self.unachievable_amount += record.unachievable_savings;
        self.delayed_amount += record.delayed_savings;
        self.initiated_amount += record.initiated_savings;
        self.achieved_count += usize::from(record.achieved_savings != 0.0);
        self.unachievable_count += usize::from(record.unachievable_savings != 0.0);
        self.delayed_count += usize::from(record.delayed_savings != 0.0);
        self.initiated_count += usize::from(record.initiated_savings != 0.0);
    }

    pub fn count(&self, category: SavingsCategory) -> usize {
        match category {
            SavingsCategory::Initiated => self.initiated_count,
            SavingsCategory::Delayed => self.delayed_count,
            SavingsCategory::Unachievable => self.unachievable_count,
            SavingsCategory::Achieved => self.achieved_count,
        }
    }
}

/// Everything the presentation layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard<'a> {
    #[serde(skip)]
    pub rows: Vec<&'a Record>,
    pub kpis: Kpis,
    pub charts: ChartData,
    pub sprint_summary: Vec<SprintSummaryRow>,
}

/// Filter `table` by `selection` and aggregate the result.
pub fn filter_and_aggregate<'a>(table: &'a Table, selection: &Selection) -> Dashboard<'a> {
    let rows = selection.apply(table);
    debug!(
        total = table.len(),
        kept = rows.len(),
        ?selection,
        "applied selection"
    );
    SavingsCalculator::aggregate(rows)
}

/// Aggregations over filtered rows. Every function is total over empty input.
pub struct SavingsCalculator;

impl SavingsCalculator {
    pub fn aggregate(rows: Vec<&Record>) -> Dashboard<'_> {
        let kpis = Self::compute_kpis(&rows);
        let charts = ChartData {
            funnel: Self::funnel(&rows),
            by_inference_type: Self::by_inference_type(&rows),
            by_sprint: Self::by_sprint(&rows),
            savings_mix: Self::savings_mix(&rows),
        };
        let sprint_summary = Self::sprint_summary(&rows);
        Dashboard {
            rows,
            kpis,
            charts,
            sprint_summary,
        }
    }

    pub fn compute_kpis(rows: &[&Record]) -> Kpis {
        let total_recommendations = rows.len();
        let total_savings_amount: f64 = rows.iter().map(|r| r.cost_savings_amount).sum();
        let total_current_cost: f64 = rows.iter().map(|r| r.current_monthly_cost).sum();
        let total_est_cost: f64 = rows.iter().map(|r| r.est_monthly_cost).sum();

        Kpis {
            total_recommendations,
            total_savings_amount,
            total_savings_percent: ratio(total_savings_amount, total_current_cost) * 100.0,
            avg_savings_per_recommendation: ratio(
                total_savings_amount,
                total_recommendations as f64,
            ),
            total_current_cost,
            total_est_cost,
        }
    }

    pub fn category_total(rows: &[&Record], category: SavingsCategory) -> f64 {
        rows.iter().map(|r| r.savings(category)).sum()
    }

    /// Stages always come out Initiated, Delayed, Unachievable, Achieved.
    pub fn funnel(rows: &[&Record]) -> Vec<FunnelStage> {
        SavingsCategory::FUNNEL_ORDER
            .iter()
            .map(|&category| FunnelStage {
                category,
                label: category.label(),
                value: Self::category_total(rows, category),
            })
            .collect()
    }

    /// Savings per inference type, largest first, ties broken by name.
    pub fn by_inference_type(rows: &[&Record]) -> Vec<CategoryValue> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for record in rows {
            *totals.entry(record.inference_type.as_str()).or_insert(0.0) +=
                record.cost_savings_amount;
        }

        let mut values: Vec<CategoryValue> = totals
            .into_iter()
            .map(|(name, value)| CategoryValue {
                name: name.to_string(),
                value,
            })
            .collect();
        values.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        values
    }

    /// Recommendation count and savings per sprint, in first-appearance order.
    pub fn by_sprint(rows: &[&Record]) -> SprintSeries {
        let mut series = SprintSeries::default();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for record in rows {
            let slot = *index.entry(record.sprint.as_str()).or_insert_with(|| {
                series.sprints.push(record.sprint.clone());
                series.recommendations.push(0);
                series.savings.push(0.0);
                series.sprints.len() - 1
            });
            series.recommendations[slot] += 1;
            series.savings[slot] += record.cost_savings_amount;
        }
        series
    }

    pub fn savings_mix(rows: &[&Record]) -> Vec<MixSlice> {
        let values: Vec<(SavingsCategory, f64)> = SavingsCategory::MIX_ORDER
            .iter()
            .map(|&category| (category, Self::category_total(rows, category)))
            .collect();
        let total: f64 = values.iter().map(|(_, v)| v).sum();

        values
            .into_iter()
            .map(|(category, value)| MixSlice {
                category,
                label: category.label(),
                value,
                share: ratio(value, total),
            })
            .collect()
    }

    /// One row per sprint, in first-appearance order.
    pub fn sprint_summary(rows: &[&Record]) -> Vec<SprintSummaryRow> {
        let mut summary: Vec<SprintSummaryRow> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for record in rows {
            let slot = *index.entry(record.sprint.as_str()).or_insert_with(|| {
                summary.push(SprintSummaryRow::new(&record.sprint));
                summary.len() - 1
            });
            summary[slot].add(record);
        }
        for row in &mut summary {
            row.savings_percent = ratio(row.total_savings, row.current_spend) * 100.0;
        }
        summary
    }
}
