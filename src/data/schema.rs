//! Schema Resolution Module
//! Maps source headers onto the fixed set of logical columns, case-insensitively.

use crate::error::SchemaError;
use std::collections::BTreeMap;

/// The logical columns every source must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalColumn {
    Sprint,
    StartDate,
    EndDate,
    InferenceType,
    Region,
    CloudProvider,
    CurrentMonthlyCost,
    EstMonthlyCost,
    CostSavingsAmount,
    CostSavingsPercent,
    AchievedSavings,
    UnachievableSavings,
    DelayedSavings,
    Initiated,
}

/// Shape of the values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Number,
}

impl LogicalColumn {
    pub const ALL: [LogicalColumn; 14] = [
        LogicalColumn::Sprint,
        LogicalColumn::StartDate,
        LogicalColumn::EndDate,
        LogicalColumn::InferenceType,
        LogicalColumn::Region,
        LogicalColumn::CloudProvider,
        LogicalColumn::CurrentMonthlyCost,
        LogicalColumn::EstMonthlyCost,
        LogicalColumn::CostSavingsAmount,
        LogicalColumn::CostSavingsPercent,
        LogicalColumn::AchievedSavings,
        LogicalColumn::UnachievableSavings,
        LogicalColumn::DelayedSavings,
        LogicalColumn::Initiated,
    ];

    /// Canonical header text as it appears in execution reports.
    pub fn header(&self) -> &'static str {
        match self {
            LogicalColumn::Sprint => "Sprint",
            LogicalColumn::StartDate => "Start Date",
            LogicalColumn::EndDate => "End Date",
            LogicalColumn::InferenceType => "Inference Type",
            LogicalColumn::Region => "Region",
            LogicalColumn::CloudProvider => "Cloud Provider",
            LogicalColumn::CurrentMonthlyCost => "Current Monthly Cost ($)",
            LogicalColumn::EstMonthlyCost => "Est. Monthly Cost ($)",
            LogicalColumn::CostSavingsAmount => "Cost Savings in $",
            LogicalColumn::CostSavingsPercent => "Cost Savings in %",
            LogicalColumn::AchievedSavings => "Achieved Savings",
            LogicalColumn::UnachievableSavings => "Unachieveable Savings",
            LogicalColumn::DelayedSavings => "Delayed Savings",
            LogicalColumn::Initiated => "Initiated",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            LogicalColumn::Sprint
            | LogicalColumn::InferenceType
            | LogicalColumn::Region
            | LogicalColumn::CloudProvider => ColumnKind::Text,
            LogicalColumn::StartDate | LogicalColumn::EndDate => ColumnKind::Date,
            _ => ColumnKind::Number,
        }
    }
}

/// Drop the `_duplicated_N` suffix readers give to a repeated header.
fn strip_dedup_suffix(header: &str) -> &str {
    match header.rsplit_once("_duplicated_") {
        Some((base, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => header,
    }
}

/// Headers compare equal after trimming and lowercasing.
fn normalize_header(header: &str) -> String {
    strip_dedup_suffix(header).trim().to_lowercase()
}

/// Logical column -> source header, one entry for every logical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    columns: BTreeMap<LogicalColumn, String>,
}

impl ResolvedSchema {
    /// Resolve every logical column against `headers`.
    ///
    /// All missing columns are reported together, in canonical order.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let mut columns = BTreeMap::new();
        let mut missing = Vec::new();

        for logical in LogicalColumn::ALL {
            let wanted = normalize_header(logical.header());
            let candidates: Vec<String> = headers
                .iter()
                .map(|h| h.as_ref())
                .filter(|h| normalize_header(h) == wanted)
                .map(|h| h.to_string())
                .collect();

            match candidates.len() {
                0 => missing.push(logical.header().to_string()),
                1 => {
                    columns.insert(logical, candidates[0].clone());
                }
                _ => {
                    return Err(SchemaError::AmbiguousColumn {
                        column: logical.header().to_string(),
                        candidates,
                    })
                }
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }

        Ok(Self { columns })
    }

    /// Source header for a logical column.
    pub fn source(&self, column: LogicalColumn) -> &str {
        self.columns
            .get(&column)
            .map(String::as_str)
            .unwrap_or_else(|| column.header())
    }

    /// Canonical header -> source header, for reporting.
    pub fn to_report_map(&self) -> BTreeMap<String, String> {
        self.columns
            .iter()
            .map(|(logical, source)| (logical.header().to_string(), source.clone()))
            .collect()
    }
}
