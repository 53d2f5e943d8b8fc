//! Canonical record model produced by the normalizer.

use crate::data::fiscal::{self, Quarter};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// The four savings-lifecycle measures carried by every recommendation.
///
/// They are independent amounts, not a partition of `cost_savings_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SavingsCategory {
    Initiated,
    Delayed,
    Unachievable,
    Achieved,
}

impl SavingsCategory {
    /// Funnel stages, top to bottom.
    pub const FUNNEL_ORDER: [SavingsCategory; 4] = [
        SavingsCategory::Initiated,
        SavingsCategory::Delayed,
        SavingsCategory::Unachievable,
        SavingsCategory::Achieved,
    ];

    /// Slice order of the savings mix.
    pub const MIX_ORDER: [SavingsCategory; 4] = [
        SavingsCategory::Achieved,
        SavingsCategory::Unachievable,
        SavingsCategory::Delayed,
        SavingsCategory::Initiated,
    ];

    /// Header of the source column holding this measure.
    pub fn label(&self) -> &'static str {
        match self {
            SavingsCategory::Initiated => "Initiated",
            SavingsCategory::Delayed => "Delayed Savings",
            SavingsCategory::Unachievable => "Unachieveable Savings",
            SavingsCategory::Achieved => "Achieved Savings",
        }
    }
}

/// One normalized recommendation row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub sprint: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub inference_type: String,
    pub region: String,
    pub cloud_provider: String,
    pub current_monthly_cost: f64,
    pub est_monthly_cost: f64,
    pub cost_savings_amount: f64,
    pub cost_savings_percent: f64,
    pub achieved_savings: f64,
    pub unachievable_savings: f64,
    pub delayed_savings: f64,
    pub initiated_savings: f64,
    pub month: u32,
    pub year: i32,
    pub fiscal_year: i32,
    pub quarter: Quarter,
}

impl Record {
    /// Record with calendar fields derived from `start_date` and every measure at zero.
    pub fn new(sprint: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            sprint: sprint.into(),
            start_date,
            end_date,
            inference_type: String::new(),
            region: String::new(),
            cloud_provider: String::new(),
            current_monthly_cost: 0.0,
            est_monthly_cost: 0.0,
            cost_savings_amount: 0.0,
            cost_savings_percent: 0.0,
            achieved_savings: 0.0,
            unachievable_savings: 0.0,
            delayed_savings: 0.0,
            initiated_savings: 0.0,
            month: start_date.month(),
            year: start_date.year(),
            fiscal_year: fiscal::fiscal_year(start_date),
            quarter: Quarter::from_month(start_date.month()),
        }
    }

    pub fn savings(&self, category: SavingsCategory) -> f64 {
        match category {
            SavingsCategory::Initiated => self.initiated_savings,
            SavingsCategory::Delayed => self.delayed_savings,
            SavingsCategory::Unachievable => self.unachievable_savings,
            SavingsCategory::Achieved => self.achieved_savings,
        }
    }

    pub fn month_name(&self) -> &'static str {
        fiscal::month_name(self.month)
    }

    pub fn fiscal_label(&self) -> String {
        fiscal::fiscal_label(self.fiscal_year)
    }

    /// "FY2025 Q1" style label.
    pub fn fiscal_quarter_label(&self) -> String {
        format!("{} {}", self.fiscal_label(), self.quarter)
    }
}

/// What the normalizer had to paper over while loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Date substituted for blank or unparsable dates.
    pub today: Option<NaiveDate>,
    pub rows: usize,
    pub defaulted_dates: usize,
    pub defaulted_numbers: usize,
    /// Logical column name -> source header it was read from.
    pub resolved_columns: BTreeMap<String, String>,
}

impl LoadReport {
    pub fn defaults_applied(&self) -> usize {
        self.defaulted_dates + self.defaulted_numbers
    }
}

/// Immutable table of records in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    report: LoadReport,
}

impl Table {
    pub fn new(records: Vec<Record>, report: LoadReport) -> Self {
        Self { records, report }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
