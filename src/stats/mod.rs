//! Stats module - filtering and savings aggregation

pub mod calculator;
pub mod filter;

pub use calculator::{
    filter_and_aggregate, CategoryValue, ChartData, Dashboard, FunnelStage, Kpis, MixSlice,
    SavingsCalculator, SprintSeries, SprintSummaryRow,
};
pub use filter::{filter_options, parse_fiscal_year, parse_month, Choice, FilterOptions, Selection};
