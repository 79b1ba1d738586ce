//! Command-line parsing for the loan portfolio generator.
//!
//! Parsing stays separate from generation; `app` maps `Cli` onto a
//! `PortfolioConfig`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};

/// Generate a synthetic credit-risk loan portfolio and write it as CSV and XLSX.
#[derive(Debug, Parser)]
#[command(name = "loanport", version, about = "Synthetic loan portfolio generator")]
pub struct Cli {
    /// Number of loans to generate. Negative values are rejected.
    #[arg(short = 'n', long, default_value_t = 1000, allow_negative_numbers = true)]
    pub loan_count: i64,

    /// Random seed; any integer, including 0 and negatives.
    #[arg(short = 's', long, default_value_t = 42, allow_negative_numbers = true)]
    pub seed: i64,

    /// Directory receiving loan_portfolio.csv and loan_portfolio.xlsx (created if missing).
    /// Relative paths resolve against the current working directory, which is the
    /// project root under `cargo run`; pass an absolute path when running elsewhere.
    #[arg(short = 'o', long, env = "LOAN_PORTFOLIO_DATA_DIR", default_value = "data")]
    pub out_dir: PathBuf,

    /// Reference ("today") date for originations and default windows (YYYY-MM-DD).
    #[arg(long = "as-of", value_name = "DATE", default_value = "2025-01-01")]
    pub as_of: NaiveDate,

    /// Print a portfolio summary after writing.
    #[arg(long)]
    pub summary: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}
