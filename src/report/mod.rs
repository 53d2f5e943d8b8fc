//! Report module - terminal, JSON and CSV renderings of a dashboard

pub mod export;
pub mod json;
pub mod text;

pub use export::{summary_frame, write_sprint_summary_csv};
pub use json::DashboardView;

/// Format a dollar amount as `$1,235`.
///
/// With `zero_dash`, amounts that round to zero (and NaN) show as an em dash.
pub fn money(amount: f64, zero_dash: bool) -> String {
    if amount.is_nan() {
        return if zero_dash { "—".to_string() } else { "$0".to_string() };
    }
    if zero_dash && amount.abs() < 0.5 {
        return "—".to_string();
    }
    format!("${}", group_thousands(amount.round() as i64))
}

/// One decimal place with a percent sign.
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
