//! Source path configuration.

use std::path::PathBuf;

/// Report read when no file is given on the command line or in the environment.
pub const DEFAULT_REPORT_PATH: &str = "sedai_execution_report_sample_v4.xlsx";

/// Environment variable overriding the default report path.
pub const REPORT_PATH_ENV: &str = "SAVINGS_DASHBOARD_FILE";

/// Pick the report to load: the positional path first, then `fallback`, then the default.
///
/// `fallback` is the `--file` value, which clap already fills from the environment.
/// A blank fallback counts as unset.
pub fn resolve_report_path(explicit: Option<PathBuf>, fallback: Option<String>) -> PathBuf {
    explicit
        .or_else(|| {
            fallback
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_report_path(
            Some(PathBuf::from("q3.csv")),
            Some("fallback.xlsx".to_string()),
        );
        assert_eq!(path, PathBuf::from("q3.csv"));
    }

    #[test]
    fn fallback_then_default() {
        assert_eq!(
            resolve_report_path(None, Some("fallback.xlsx".to_string())),
            PathBuf::from("fallback.xlsx")
        );
        assert_eq!(
            resolve_report_path(None, Some("  ".to_string())),
            PathBuf::from(DEFAULT_REPORT_PATH)
        );
        assert_eq!(
            resolve_report_path(None, None),
            PathBuf::from(DEFAULT_REPORT_PATH)
        );
    }
}
