//! Savings Dashboard - cost-optimization recommendation analytics
//!
//! Loads an execution report (XLSX or CSV), normalizes it onto a fixed schema with
//! fiscal calendar fields (FY = Apr 1 to Mar 31, labeled by its closing year), and
//! aggregates KPIs, chart series and a sprint summary for a filter selection.
//!
//! ```no_run
//! use savings_dashboard::data::{load, Source};
//! use savings_dashboard::stats::{filter_and_aggregate, Choice, Selection};
//!
//! let table = load(&Source::path("execution_report.xlsx"))?;
//! let selection = Selection { fiscal_year: Choice::Only(2025), ..Selection::all() };
//! let dashboard = filter_and_aggregate(&table, &selection);
//! println!("{} recommendations", dashboard.kpis.total_recommendations);
//! # Ok::<(), savings_dashboard::DashboardError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod session;
pub mod stats;

pub use error::{DashboardError, DashboardResult, SchemaError};
pub use session::Session;
