//! Date and number cell parsing.

use chrono::{Days, NaiveDate, NaiveDateTime};

/// Day zero of the Excel 1900 date system (accounts for the fictitious 1900-02-29).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial numbers outside this range are not treated as dates (year ~1900 to ~9999).
const EXCEL_SERIAL_RANGE: std::ops::RangeInclusive<f64> = 1.0..=2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Convert an Excel serial day number to a calendar date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !EXCEL_SERIAL_RANGE.contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Parse a text date cell: ISO-ish or US-style.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Parse a workbook date cell, which may also hold a bare Excel serial number.
pub fn parse_workbook_date(raw: &str) -> Option<NaiveDate> {
    parse_date(raw).or_else(|| raw.trim().parse::<f64>().ok().and_then(excel_serial_to_date))
}

/// Parse a numeric cell, tolerating a currency sign, thousands separators and a percent sign.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
