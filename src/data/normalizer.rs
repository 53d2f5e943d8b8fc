//! Normalizer Module
//! Turns a raw text DataFrame into the canonical `Table`, applying defaults and
//! deriving the fiscal calendar fields once per load.

use crate::data::dates::{parse_date, parse_number, parse_workbook_date};
use crate::data::loader::SourceFormat;
use crate::data::record::{LoadReport, Record, Table};
use crate::data::schema::{LogicalColumn, ResolvedSchema};
use crate::error::DashboardResult;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Text cells of the logical columns, pulled out of the frame once.
struct RawColumns {
    cells: HashMap<LogicalColumn, Vec<Option<String>>>,
}

impl RawColumns {
    fn extract(df: &DataFrame, schema: &ResolvedSchema) -> DashboardResult<Self> {
        let mut cells = HashMap::new();
        for logical in LogicalColumn::ALL {
            let source = schema.source(logical);
            let series = df
                .column(source)?
                .as_materialized_series()
                .cast(&DataType::String)?;
            let values: Vec<Option<String>> = series
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            debug!(column = logical.header(), source, "resolved column");
            cells.insert(logical, values);
        }
        Ok(Self { cells })
    }

    fn get(&self, column: LogicalColumn, row: usize) -> Option<&str> {
        self.cells
            .get(&column)
            .and_then(|values| values.get(row))
            .and_then(|v| v.as_deref())
    }
}

/// Per-load coercion with a fixed substitute date.
struct Coercer<'a> {
    raw: &'a RawColumns,
    parse_date: fn(&str) -> Option<NaiveDate>,
    today: NaiveDate,
    defaulted_dates: usize,
    defaulted_numbers: usize,
}

impl<'a> Coercer<'a> {
    fn text(&self, column: LogicalColumn, row: usize) -> String {
        self.raw
            .get(column, row)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Blank or unparsable dates become the load-time date.
    fn date(&mut self, column: LogicalColumn, row: usize) -> NaiveDate {
        match self.raw.get(column, row).and_then(self.parse_date) {
            Some(date) => date,
            None => {
                self.defaulted_dates += 1;
                self.today
            }
        }
    }

    /// Blank cells become zero silently; unparsable ones are counted.
    fn number(&mut self, column: LogicalColumn, row: usize) -> f64 {
        let Some(cell) = self.raw.get(column, row) else {
            return 0.0;
        };
        if cell.trim().is_empty() {
            return 0.0;
        }
        parse_number(cell).unwrap_or_else(|| {
            self.defaulted_numbers += 1;
            0.0
        })
    }

    fn record(&mut self, row: usize) -> Record {
        let start_date = self.date(LogicalColumn::StartDate, row);
        let end_date = self.date(LogicalColumn::EndDate, row);
        Record {
            inference_type: self.text(LogicalColumn::InferenceType, row),
            region: self.text(LogicalColumn::Region, row),
            cloud_provider: self.text(LogicalColumn::CloudProvider, row),
            current_monthly_cost: self.number(LogicalColumn::CurrentMonthlyCost, row),
            est_monthly_cost: self.number(LogicalColumn::EstMonthlyCost, row),
            cost_savings_amount: self.number(LogicalColumn::CostSavingsAmount, row),
            cost_savings_percent: self.number(LogicalColumn::CostSavingsPercent, row),
            achieved_savings: self.number(LogicalColumn::AchievedSavings, row),
            unachievable_savings: self.number(LogicalColumn::UnachievableSavings, row),
            delayed_savings: self.number(LogicalColumn::DelayedSavings, row),
            initiated_savings: self.number(LogicalColumn::Initiated, row),
            ..Record::new(self.text(LogicalColumn::Sprint, row), start_date, end_date)
        }
    }
}

/// Handles header resolution and cell coercion.
pub struct Normalizer;

impl Normalizer {
    /// Build the canonical table from a raw frame.
    ///
    /// Fails only when the required columns cannot be resolved; every cell-level
    /// problem is defaulted and counted in the table's `LoadReport`. Bare Excel
    /// serial numbers are accepted as dates only for workbook sources.
    pub fn normalize(
        df: &DataFrame,
        format: SourceFormat,
        today: NaiveDate,
    ) -> DashboardResult<Table> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let schema = ResolvedSchema::resolve(&headers)?;
        let raw = RawColumns::extract(df, &schema)?;

        let mut coercer = Coercer {
            raw: &raw,
            parse_date: match format {
                SourceFormat::Csv => parse_date,
                SourceFormat::Workbook => parse_workbook_date,
            },
            today,
            defaulted_dates: 0,
            defaulted_numbers: 0,
        };
        let records: Vec<Record> = (0..df.height()).map(|row| coercer.record(row)).collect();

        let report = LoadReport {
            today: Some(today),
            rows: records.len(),
            defaulted_dates: coercer.defaulted_dates,
            defaulted_numbers: coercer.defaulted_numbers,
            resolved_columns: schema.to_report_map(),
        };
        if report.defaults_applied() > 0 {
            warn!(
                dates = report.defaulted_dates,
                numbers = report.defaulted_numbers,
                %today,
                "substituted defaults for unusable cells"
            );
        }

        Ok(Table::new(records, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fiscal::Quarter;
    use crate::error::{DashboardError, SchemaError};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn frame(rows: &[[&str; 14]]) -> DataFrame {
        let columns: Vec<Column> = LogicalColumn::ALL
            .iter()
            .enumerate()
            .map(|(idx, logical)| {
                let values: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| {
                        let cell = row[idx];
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect();
                Column::new(logical.header().into(), values)
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn derives_calendar_fields_from_start_date() {
        let df = frame(&[
            [
                "S1", "2024-05-01", "2024-05-31", "Rightsizing", "us-east-1", "AWS", "1000",
                "800", "200", "20", "200", "0", "0", "0",
            ],
            [
                "S1", "2024-02-01", "2024-02-28", "Scheduling", "eu-west-1", "AWS", "2000",
                "2000", "0", "0", "0", "0", "0", "500",
            ],
        ]);
        let table = Normalizer::normalize(&df, SourceFormat::Csv, today()).unwrap();
        assert_eq!(table.len(), 2);

        let a = &table.records()[0];
        assert_eq!((a.month, a.year, a.fiscal_year), (5, 2024, 2025));
        assert_eq!(a.quarter, Quarter::Q1);
        assert_eq!(a.fiscal_quarter_label(), "FY2025 Q1");
        assert_eq!(a.cost_savings_amount, 200.0);
        assert_eq!(a.region, "us-east-1");

        let b = &table.records()[1];
        assert_eq!((b.month, b.year, b.fiscal_year), (2, 2024, 2024));
        assert_eq!(b.quarter, Quarter::Q4);
        assert_eq!(b.initiated_savings, 500.0);
        assert_eq!(table.report().defaults_applied(), 0);
    }

    #[test]
    fn missing_dates_default_to_load_date() {
        let df = frame(&[[
            "S9", "", "not a date", "Rightsizing", "", "", "10", "5", "5", "50", "", "", "", "",
        ]]);
        let table = Normalizer::normalize(&df, SourceFormat::Csv, today()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.start_date, today());
        assert_eq!(record.end_date, today());
        assert_eq!((record.month, record.year, record.fiscal_year), (10, 2026, 2027));
        assert_eq!(record.quarter, Quarter::Q3);
        assert_eq!(table.report().defaulted_dates, 2);
        assert_eq!(table.report().defaulted_numbers, 0);
    }

    #[test]
    fn serial_dates_only_for_workbooks() {
        let row = [
            "S1", "45413", "2024", "", "", "", "1", "1", "0", "0", "", "", "", "",
        ];
        let csv = Normalizer::normalize(&frame(&[row]), SourceFormat::Csv, today()).unwrap();
        assert_eq!(csv.records()[0].start_date, today());
        assert_eq!(csv.records()[0].end_date, today());
        assert_eq!(csv.report().defaulted_dates, 2);

        let workbook =
            Normalizer::normalize(&frame(&[row]), SourceFormat::Workbook, today()).unwrap();
        let record = &workbook.records()[0];
        assert_eq!(record.start_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(record.end_date, NaiveDate::from_ymd_opt(1905, 7, 16).unwrap());
        assert_eq!(workbook.report().defaulted_dates, 0);
    }

    #[test]
    fn unparsable_numbers_become_zero_and_are_counted() {
        let df = frame(&[[
            "S1", "2024-05-01", "2024-05-02", "", "", "", "abc", "$1,500", "n/a", "12%", "", "",
            "", "",
        ]]);
        let table = Normalizer::normalize(&df, SourceFormat::Csv, today()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.current_monthly_cost, 0.0);
        assert_eq!(record.est_monthly_cost, 1500.0);
        assert_eq!(record.cost_savings_amount, 0.0);
        assert_eq!(record.cost_savings_percent, 12.0);
        assert_eq!(table.report().defaulted_numbers, 2);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let df = DataFrame::new(vec![Column::new("Sprint".into(), vec!["S1"])]).unwrap();
        let err = Normalizer::normalize(&df, SourceFormat::Csv, today()).unwrap_err();
        match err {
            DashboardError::Schema(SchemaError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), 13);
                assert!(!missing.contains(&"Sprint".to_string()));
                assert_eq!(missing[0], "Start Date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn report_lists_resolved_headers() {
        let df = frame(&[]);
        let table = Normalizer::normalize(&df, SourceFormat::Csv, today()).unwrap();
        assert!(table.is_empty());
        let report = table.report();
        assert_eq!(report.resolved_columns.len(), 14);
        assert_eq!(report.resolved_columns["Cost Savings in $"], "Cost Savings in $");
        assert_eq!(report.today, Some(today()));
    }
}
