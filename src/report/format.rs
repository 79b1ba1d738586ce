//! Formatted terminal output.
//!
//! Formatting lives here so generation and writing stay free of presentation.

use crate::domain::PortfolioConfig;
use crate::io::WrittenFiles;
use crate::report::PortfolioSummary;

/// Lines printed after a successful run.
pub fn format_written_files(files: &WrittenFiles) -> String {
    format!(
        "Saved loan portfolio to:\n- {}\n- {}",
        files.csv.display(),
        files.xlsx.display()
    )
}

/// Format the portfolio summary block.
pub fn format_summary(summary: &PortfolioSummary, config: &PortfolioConfig) -> String {
    let mut out = String::new();

    out.push_str("=== Loan Portfolio Summary ===\n");
    out.push_str(&format!("As-of: {}\n", config.reference_date));
    out.push_str(&format!("Seed: {}\n", config.seed));
    out.push_str(&format!(
        "Loans: {} ({} borrowers)\n",
        summary.loans, summary.borrowers
    ));

    out.push_str("\nSegments:\n");
    for (segment, count) in &summary.by_segment {
        out.push_str(&format!(
            "  {:<10} {:>7} {:>7}\n",
            segment.as_str(),
            count,
            fmt_pct(share(*count, summary.loans))
        ));
    }

    out.push_str("\nRatings:\n");
    for (rating, count) in &summary.by_rating {
        out.push_str(&format!(
            "  {:<10} {:>7} {:>7}\n",
            rating.as_str(),
            count,
            fmt_pct(share(*count, summary.loans))
        ));
    }

    out.push_str("\nRisk:\n");
    out.push_str(&format!(
        "  Defaults:       {} ({})\n",
        summary.defaults,
        fmt_pct(summary.default_rate)
    ));
    out.push_str(&format!("  Total EAD:      {:.2}\n", summary.total_ead));
    out.push_str(&format!("  Expected loss:  {:.2}\n", summary.total_expected_loss));
    out.push_str(&format!("  Provisions:     {:.2}\n", summary.total_provisions));
    out.push_str(&format!(
        "  Coverage ratio: {}\n",
        summary
            .coverage_ratio
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "  Collateralised: {} ({}), mean LTV {}\n",
        summary.collateralised,
        fmt_pct(share(summary.collateralised, summary.loans)),
        summary
            .mean_ltv
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "-".to_string())
    ));

    out
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn fmt_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::report::summarize;

    #[test]
    fn written_files_lists_both_paths() {
        let files = WrittenFiles {
            csv: PathBuf::from("data/loan_portfolio.csv"),
            xlsx: PathBuf::from("data/loan_portfolio.xlsx"),
        };
        assert_eq!(
            format_written_files(&files),
            "Saved loan portfolio to:\n- data/loan_portfolio.csv\n- data/loan_portfolio.xlsx"
        );
    }

    #[test]
    fn summary_of_empty_portfolio_has_placeholders() {
        let text = format_summary(&summarize(&[]), &PortfolioConfig::default());
        assert!(text.contains("As-of: 2025-01-01"));
        assert!(text.contains("Loans: 0 (0 borrowers)"));
        assert!(text.contains("Coverage ratio: -"));
        assert!(text.contains("BB/B"));
    }
}
