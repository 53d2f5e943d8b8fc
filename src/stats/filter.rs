//! Filter Module
//! User selections over month, year, fiscal year and sprint.

use crate::data::{Record, Table};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One filter dimension: either unconstrained or pinned to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("All"),
            Choice::Only(v) => v.fmt(f),
        }
    }
}

impl<T: Serialize> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Choice::All => serializer.serialize_str("All"),
            Choice::Only(v) => v.serialize(serializer),
        }
    }
}

fn is_all_keyword(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

impl<T: FromStr> FromStr for Choice<T>
where
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if is_all_keyword(raw) {
            return Ok(Choice::All);
        }
        raw.trim()
            .parse::<T>()
            .map(Choice::Only)
            .map_err(|e| format!("invalid value '{}': {}", raw.trim(), e))
    }
}

/// Parse a month filter: "All" or 1-12.
pub fn parse_month(raw: &str) -> Result<Choice<u32>, String> {
    match raw.parse::<Choice<u32>>()? {
        Choice::Only(m) if !(1..=12).contains(&m) => {
            Err(format!("month must be between 1 and 12, got {}", m))
        }
        choice => Ok(choice),
    }
}

/// Parse a fiscal year filter: "All", "2025" or "FY2025".
pub fn parse_fiscal_year(raw: &str) -> Result<Choice<i32>, String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("FY")
        .or_else(|| trimmed.strip_prefix("fy"))
        .unwrap_or(trimmed);
    digits.parse::<Choice<i32>>()
}

/// The four filter dimensions, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub month: Choice<u32>,
    pub year: Choice<i32>,
    pub fiscal_year: Choice<i32>,
    pub sprint: Choice<String>,
}

impl Selection {
    /// No constraint on any dimension.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month.is_all() && self.year.is_all() && self.fiscal_year.is_all() && self.sprint.is_all()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.month.matches(&record.month)
            && self.year.matches(&record.year)
            && self.fiscal_year.matches(&record.fiscal_year)
            && self.sprint.matches(&record.sprint)
    }

    /// Rows satisfying every active constraint, in original order.
    pub fn apply<'a>(&self, table: &'a Table) -> Vec<&'a Record> {
        table.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct values available for each filter, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub months: Vec<u32>,
    pub years: Vec<i32>,
    pub fiscal_years: Vec<i32>,
    pub sprints: Vec<String>,
}

pub fn filter_options(table: &Table) -> FilterOptions {
    let months: BTreeSet<u32> = table.iter().map(|r| r.month).collect();
    let years: BTreeSet<i32> = table.iter().map(|r| r.year).collect();
    let fiscal_years: BTreeSet<i32> = table.iter().map(|r| r.fiscal_year).collect();
    let sprints: BTreeSet<&str> = table.iter().map(|r| r.sprint.as_str()).collect();

    FilterOptions {
        months: months.into_iter().collect(),
        years: years.into_iter().collect(),
        fiscal_years: fiscal_years.into_iter().collect(),
        sprints: sprints.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadReport;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(sprint: &str, y: i32, m: u32) -> Record {
        let d = NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        Record::new(sprint, d, d)
    }

    fn table() -> Table {
        Table::new(
            vec![
                record("S2", 2024, 5),
                record("S1", 2024, 2),
                record("S1", 2023, 11),
                record("S3", 2024, 5),
            ],
            LoadReport::default(),
        )
    }

    #[test]
    fn all_selection_keeps_every_row_in_order() {
        let table = table();
        let rows = Selection::all().apply(&table);
        assert_eq!(rows.len(), 4);
        let sprints: Vec<&str> = rows.iter().map(|r| r.sprint.as_str()).collect();
        assert_eq!(sprints, vec!["S2", "S1", "S1", "S3"]);
    }

    #[test]
    fn constraints_are_anded() {
        let table = table();
        let selection = Selection {
            month: Choice::Only(5),
            year: Choice::Only(2024),
            ..Selection::all()
        };
        let rows = selection.apply(&table);
        assert_eq!(rows.len(), 2);

        let selection = Selection {
            month: Choice::Only(5),
            sprint: Choice::Only("S3".to_string()),
            ..Selection::all()
        };
        let rows = selection.apply(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sprint, "S3");
    }

    #[test]
    fn fiscal_year_filter_spans_calendar_years() {
        let table = table();
        let selection = Selection {
            fiscal_year: Choice::Only(2024),
            ..Selection::all()
        };
        let rows = selection.apply(&table);
        // Nov 2023 and Feb 2024 both close in FY2024.
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.sprint == "S1"));
    }

    #[test]
    fn parses_choices() {
        assert_eq!("All".parse::<Choice<i32>>().unwrap(), Choice::All);
        assert_eq!("all".parse::<Choice<i32>>().unwrap(), Choice::All);
        assert_eq!("".parse::<Choice<i32>>().unwrap(), Choice::All);
        assert_eq!(" 2024 ".parse::<Choice<i32>>().unwrap(), Choice::Only(2024));
        assert!("twenty".parse::<Choice<i32>>().is_err());
        assert_eq!(
            "S1".parse::<Choice<String>>().unwrap(),
            Choice::Only("S1".to_string())
        );
    }

    #[test]
    fn month_and_fiscal_year_parsers() {
        assert_eq!(parse_month("4").unwrap(), Choice::Only(4));
        assert_eq!(parse_month("All").unwrap(), Choice::All);
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());
        assert_eq!(parse_fiscal_year("FY2025").unwrap(), Choice::Only(2025));
        assert_eq!(parse_fiscal_year("2025").unwrap(), Choice::Only(2025));
        assert_eq!(parse_fiscal_year("all").unwrap(), Choice::All);
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let options = filter_options(&table());
        assert_eq!(options.months, vec![2, 5, 11]);
        assert_eq!(options.years, vec![2023, 2024]);
        assert_eq!(options.fiscal_years, vec![2024, 2025]);
        assert_eq!(options.sprints, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn choice_display_and_serialize() {
        assert_eq!(Choice::<u32>::All.to_string(), "All");
        assert_eq!(Choice::Only(7).to_string(), "7");
        let json = serde_json::to_string(&Selection {
            month: Choice::Only(5),
            ..Selection::all()
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"month":5,"year":"All","fiscal_year":"All","sprint":"All"}"#
        );
    }
}
