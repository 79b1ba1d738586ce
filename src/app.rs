//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - generates the portfolio
//! - writes the CSV/XLSX outputs
//! - prints the output paths (and optionally a summary)

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::PortfolioConfig;
use crate::error::AppError;

/// Entry point for the `loanport` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may provide LOAN_PORTFOLIO_DATA_DIR; a missing file is fine.
    dotenvy::dotenv().ok();
    run_with(Cli::parse())
}

/// Generate, write and report for already-parsed arguments.
pub fn run_with(cli: Cli) -> Result<(), AppError> {
    init_tracing(cli.verbose);

    let config = portfolio_config_from_args(&cli);
    debug!(?config, "resolved configuration");

    let records = crate::data::generate_portfolio(&config)?;
    info!(loans = records.len(), "portfolio generated");

    let files = crate::io::write_portfolio(&records, &cli.out_dir)?;
    println!("{}", crate::report::format_written_files(&files));

    if cli.summary {
        let summary = crate::report::summarize(&records);
        println!();
        println!("{}", crate::report::format_summary(&summary, &config));
    }

    Ok(())
}

pub fn portfolio_config_from_args(cli: &Cli) -> PortfolioConfig {
    PortfolioConfig {
        loan_count: cli.loan_count,
        seed: cli.seed,
        reference_date: cli.as_of,
        ..PortfolioConfig::default()
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` flags pick the level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_maps_onto_default_parameters() {
        let cli = Cli::parse_from(["loanport", "-n", "25", "-s", "-3", "--as-of", "2023-12-31"]);
        let config = portfolio_config_from_args(&cli);
        assert_eq!(config.loan_count, 25);
        assert_eq!(config.seed, -3);
        assert_eq!(config.reference_date.to_string(), "2023-12-31");
        assert_eq!(config.retail, PortfolioConfig::default().retail);
    }

    #[test]
    fn negative_count_fails_before_writing() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = root.path().join("data");
        let cli = Cli::parse_from(["loanport", "-n", "-5", "-o", out_dir.to_str().unwrap()]);

        let err = run_with(cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!out_dir.exists());
    }

    #[test]
    fn valid_run_writes_both_files() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = root.path().join("data");
        let cli = Cli::parse_from(["loanport", "-n", "30", "-o", out_dir.to_str().unwrap(), "--summary"]);

        run_with(cli).unwrap();
        assert!(out_dir.join(crate::io::CSV_FILE_NAME).is_file());
        assert!(out_dir.join(crate::io::XLSX_FILE_NAME).is_file());
    }
}
