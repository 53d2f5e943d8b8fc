//! Fiscal Calendar Module
//! Fiscal years run Apr 1 to Mar 31 and are labeled by their closing calendar year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First calendar month of the fiscal year.
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// Fiscal quarter, Q1 = Apr-Jun through Q4 = Jan-Mar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Map a calendar month (1-12) to its fiscal quarter.
    ///
    /// Out-of-range months are clamped into 1..=12 so the mapping stays total.
    pub fn from_month(month: u32) -> Self {
        match month.clamp(1, 12) {
            4..=6 => Quarter::Q1,
            7..=9 => Quarter::Q2,
            10..=12 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fiscal year containing `date`.
pub fn fiscal_year(date: NaiveDate) -> i32 {
    if date.month() >= FISCAL_YEAR_START_MONTH {
        date.year() + 1
    } else {
        date.year()
    }
}

/// "FY2025" style label.
pub fn fiscal_label(fiscal_year: i32) -> String {
    format!("FY{}", fiscal_year)
}

/// English month name for 1-12, empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    month
        .checked_sub(1)
        .and_then(|idx| NAMES.get(idx as usize))
        .copied()
        .unwrap_or("")
}
