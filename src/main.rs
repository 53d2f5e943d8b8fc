//! Savings Dashboard - cost-optimization execution report viewer
//!
//! Loads an execution report and prints KPIs, chart series and the sprint summary
//! for the selected month / year / fiscal year / sprint.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use savings_dashboard::config::{self, DEFAULT_REPORT_PATH, REPORT_PATH_ENV};
use savings_dashboard::data::Source;
use savings_dashboard::report::{self, DashboardView};
use savings_dashboard::stats::{parse_fiscal_year, parse_month, Choice, Selection};
use savings_dashboard::Session;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "savings-dashboard")]
#[command(about = "One-page executive view of cost-optimization savings")]
#[command(long_about = "Loads an execution report (XLSX or CSV) and prints KPIs, the savings
funnel, savings by inference type, savings mix, recommendations by sprint and the
sprint summary table.

FISCAL CALENDAR:
  FY runs Apr 1 to Mar 31 and is labeled by its end year (Apr 2024 - Mar 2025 = FY2025).
  Q1=Apr-Jun, Q2=Jul-Sep, Q3=Oct-Dec, Q4=Jan-Mar.

EXAMPLES:
  savings-dashboard report.xlsx
  savings-dashboard report.xlsx --fy FY2025 --sprint S14
  savings-dashboard report.csv --format json --include-rows
  savings-dashboard report.xlsx --export-summary summary.csv")]
#[command(version)]
struct Cli {
    /// Execution report to load (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    file: Option<PathBuf>,

    /// Report path used when FILE is not given
    #[arg(long = "file", env = REPORT_PATH_ENV, value_name = "PATH", default_value = DEFAULT_REPORT_PATH)]
    default_file: String,

    /// Calendar month 1-12, or All
    #[arg(long, default_value = "All", value_parser = parse_month)]
    month: Choice<u32>,

    /// Calendar year, or All
    #[arg(long, default_value = "All")]
    year: Choice<i32>,

    /// Fiscal year (2025 or FY2025), or All
    #[arg(long = "fy", default_value = "All", value_parser = parse_fiscal_year)]
    fiscal_year: Choice<i32>,

    /// Sprint name, or All
    #[arg(long, default_value = "All")]
    sprint: Choice<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include the filtered rows in JSON output
    #[arg(long)]
    include_rows: bool,

    /// Also write the sprint summary to this CSV file
    #[arg(long, value_name = "PATH")]
    export_summary: Option<PathBuf>,

    /// Print the available filter values and exit
    #[arg(long)]
    list_options: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn selection(&self) -> Selection {
        Selection {
            month: self.month.clone(),
            year: self.year.clone(),
            fiscal_year: self.fiscal_year.clone(),
            sprint: self.sprint.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "savings_dashboard=debug"
    } else {
        "savings_dashboard=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = config::resolve_report_path(cli.file.clone(), Some(cli.default_file.clone()));
    let source = Source::path(&path);

    let mut session = Session::new();
    session
        .load(&source)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    session.select(cli.selection());

    if cli.list_options {
        let options = session.options().unwrap_or_default();
        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
            OutputFormat::Text => {
                let join = |v: Vec<String>| v.join(", ");
                println!("Month:  {}", join(options.months.iter().map(|m| m.to_string()).collect()));
                println!("Year:   {}", join(options.years.iter().map(|y| y.to_string()).collect()));
                println!(
                    "FY:     {}",
                    join(options.fiscal_years.iter().map(|y| format!("FY{}", y)).collect())
                );
                println!("Sprint: {}", options.sprints.join(", "));
            }
        }
        return Ok(());
    }

    let table = session.table().context("no table loaded")?;
    let dashboard = session.dashboard().context("no table loaded")?;

    if let Some(export_path) = &cli.export_summary {
        report::write_sprint_summary_csv(&dashboard.sprint_summary, export_path)
            .with_context(|| format!("Failed to write {}", export_path.display()))?;
    }

    match cli.format {
        OutputFormat::Text => print!("{}", report::text::render(&dashboard, session.selection())),
        OutputFormat::Json => {
            let view = DashboardView::new(
                &dashboard,
                session.selection(),
                table.report(),
                cli.include_rows,
            );
            println!("{}", view.to_json_pretty()?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
