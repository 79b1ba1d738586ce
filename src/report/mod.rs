//! Reporting utilities: portfolio summary statistics and console formatting.

pub mod format;

use std::collections::{BTreeMap, HashSet};

use crate::domain::{InternalRating, LoanRecord, Segment};

pub use format::*;

/// Headline figures for a generated portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub loans: usize,
    pub borrowers: usize,
    pub by_segment: BTreeMap<Segment, usize>,
    pub by_rating: BTreeMap<InternalRating, usize>,
    pub defaults: usize,
    /// Defaults / loans; `0.0` for an empty portfolio.
    pub default_rate: f64,
    pub total_ead: f64,
    pub total_expected_loss: f64,
    pub total_provisions: f64,
    /// Provisions / expected loss; `None` when expected loss is zero.
    pub coverage_ratio: Option<f64>,
    pub collateralised: usize,
    /// Mean LTV over collateralised loans.
    pub mean_ltv: Option<f64>,
}

/// Aggregate a portfolio. Segments and ratings with no loans are reported as zero.
pub fn summarize(records: &[LoanRecord]) -> PortfolioSummary {
    let mut by_segment: BTreeMap<Segment, usize> = Segment::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_rating: BTreeMap<InternalRating, usize> =
        InternalRating::ALL.iter().map(|r| (*r, 0)).collect();
    let mut borrowers = HashSet::new();

    let mut defaults = 0;
    let mut total_ead = 0.0;
    let mut total_expected_loss = 0.0;
    let mut total_provisions = 0.0;
    let mut ltv_sum = 0.0;
    let mut ltv_count = 0usize;

    for r in records {
        borrowers.insert(r.borrower_id);
        *by_segment.entry(r.segment).or_default() += 1;
        *by_rating.entry(r.internal_rating).or_default() += 1;
        if r.is_default {
            defaults += 1;
        }
        total_ead += r.ead;
        total_expected_loss += r.expected_loss;
        total_provisions += r.provision_amount;
        if let Some(ltv) = r.ltv {
            ltv_sum += ltv;
            ltv_count += 1;
        }
    }

    let default_rate = if records.is_empty() {
        0.0
    } else {
        defaults as f64 / records.len() as f64
    };
    let coverage_ratio = (total_expected_loss > 0.0).then(|| total_provisions / total_expected_loss);
    let mean_ltv = (ltv_count > 0).then(|| ltv_sum / ltv_count as f64);

    PortfolioSummary {
        loans: records.len(),
        borrowers: borrowers.len(),
        by_segment,
        by_rating,
        defaults,
        default_rate,
        total_ead,
        total_expected_loss,
        total_provisions,
        coverage_ratio,
        collateralised: records.iter().filter(|r| r.has_collateral).count(),
        mean_ltv,
    }
}
