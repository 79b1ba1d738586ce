//! Synthetic loan portfolio generation.
//!
//! One `StdRng`, seeded from the configured seed, is consumed in a fixed order.
//! Every step draws a full-length vector in `loan_id` order; segment-dependent
//! quantities draw one full-length vector per segment (Retail, SME, Corporate)
//! and each row then picks the entry of its own segment:
//!
//! 1. borrower id
//! 2. segment
//! 3. country
//! 4. origination offset (days before the reference date)
//! 5. maturity term (years)
//! 6. currency
//! 7. rate spread, per segment
//! 8. one-year PD, per segment
//! 9. LGD
//! 10. EAD
//! 11. collateral flag
//! 12. target LTV, per segment
//! 13. default flag, Bernoulli(pd) per row
//! 14. default date offset, only for defaulted rows with a non-empty window
//! 15. days past due
//! 16. provision noise
//!
//! The internal rating is a pure function of the PD and consumes no draws.
//! Reordering any step changes every value drawn after it.

use chrono::{Duration, NaiveDate};
use rand::distributions::{Bernoulli, Distribution, Uniform, WeightedIndex};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Beta, LogNormal, Normal};
use tracing::debug;

use crate::domain::{Currency, InternalRating, LoanRecord, MAX_LOANS, PortfolioConfig, Segment};
use crate::error::AppError;

/// Days per maturity year; terms are whole multiples of it.
const DAYS_PER_YEAR: i64 = 365;

/// Generate `config.loan_count` loans.
///
/// Pure function of `config`: identical configs give identical portfolios.
/// A zero count yields an empty portfolio; a negative count is rejected before
/// any draw is made.
pub fn generate_portfolio(config: &PortfolioConfig) -> Result<Vec<LoanRecord>, AppError> {
    let n = validate_config(config)?;

    // Two's-complement reinterpretation keeps 0 and negative seeds distinct and stable.
    let mut rng = StdRng::seed_from_u64(config.seed as u64);
    debug!(
        loan_count = n,
        seed = config.seed,
        reference_date = %config.reference_date,
        "generating loan portfolio"
    );

    let borrower_max = (n as u64 / 2).max(1);
    let borrower_id: Vec<u64> = (0..n).map(|_| rng.gen_range(1..=borrower_max)).collect();

    let segment_weights: Vec<f64> = Segment::ALL.iter().map(|s| config.segment(*s).weight).collect();
    let segment_dist = WeightedIndex::new(&segment_weights)
        .map_err(|e| AppError::new(2, format!("Invalid segment weights: {e}")))?;
    let segment: Vec<Segment> = (0..n).map(|_| Segment::ALL[segment_dist.sample(&mut rng)]).collect();

    let country: Vec<_> = (0..n)
        .map(|_| config.countries[rng.gen_range(0..config.countries.len())])
        .collect();

    let origination_offset: Vec<i64> = (0..n)
        .map(|_| rng.gen_range(0..config.origination_window_days))
        .collect();
    let maturity_years: Vec<i64> = (0..n)
        .map(|_| rng.gen_range(config.maturity_years_min..=config.maturity_years_max))
        .collect();

    let currency_dist = WeightedIndex::new(config.currency_weights)
        .map_err(|e| AppError::new(2, format!("Invalid currency weights: {e}")))?;
    let currency: Vec<_> = (0..n)
        .map(|_| Currency::ALL[currency_dist.sample(&mut rng)])
        .collect();

    let mut spreads = Vec::with_capacity(Segment::ALL.len());
    for seg in Segment::ALL {
        let params = config.segment(seg);
        let dist = Normal::new(params.spread_mean, params.spread_sd)
            .map_err(|e| AppError::new(2, format!("Invalid {} spread distribution: {e}", seg.as_str())))?;
        spreads.push(sample_vec(&mut rng, &dist, n));
    }

    let mut pds = Vec::with_capacity(Segment::ALL.len());
    for seg in Segment::ALL {
        let params = config.segment(seg);
        let dist = Beta::new(params.pd_alpha, params.pd_beta)
            .map_err(|e| AppError::new(2, format!("Invalid {} PD distribution: {e}", seg.as_str())))?;
        pds.push(sample_vec(&mut rng, &dist, n));
    }

    let lgd = sample_vec(&mut rng, &Uniform::new_inclusive(config.lgd_low, config.lgd_high), n);

    let ead_dist = LogNormal::new(config.ead_log_mu, config.ead_log_sigma)
        .map_err(|e| AppError::new(2, format!("Invalid EAD distribution: {e}")))?;
    let ead = sample_vec(&mut rng, &ead_dist, n);

    let collateral_dist = Bernoulli::new(config.collateral_probability)
        .map_err(|e| AppError::new(2, format!("Invalid collateral probability: {e}")))?;
    let has_collateral = sample_vec(&mut rng, &collateral_dist, n);

    let mut ltv_targets = Vec::with_capacity(Segment::ALL.len());
    for seg in Segment::ALL {
        let params = config.segment(seg);
        let dist = Uniform::new_inclusive(params.ltv_low, params.ltv_high);
        ltv_targets.push(sample_vec(&mut rng, &dist, n));
    }

    let mut origination_date = Vec::with_capacity(n);
    let mut maturity_date = Vec::with_capacity(n);
    for i in 0..n {
        let origination = shift_days(config.reference_date, -origination_offset[i])?;
        let maturity = shift_days(origination, maturity_years[i] * DAYS_PER_YEAR)?;
        origination_date.push(origination);
        maturity_date.push(maturity);
    }

    let pd_1y: Vec<f64> = (0..n).map(|i| pds[segment[i].index()][i]).collect();

    let mut is_default = Vec::with_capacity(n);
    for (i, &pd) in pd_1y.iter().enumerate() {
        let dist = Bernoulli::new(pd)
            .map_err(|e| AppError::new(4, format!("Loan {}: PD {pd} is not a probability: {e}", i + 1)))?;
        is_default.push(dist.sample(&mut rng));
    }

    let mut default_date = Vec::with_capacity(n);
    for i in 0..n {
        let date = if is_default[i] {
            draw_default_date(
                &mut rng,
                origination_date[i],
                config.reference_date.min(maturity_date[i]),
            )?
        } else {
            None
        };
        default_date.push(date);
    }

    let dpd_default = Uniform::new_inclusive(config.dpd_default_min, config.dpd_default_max);
    let dpd_performing = Uniform::new_inclusive(config.dpd_performing_min, config.dpd_performing_max);
    let days_past_due: Vec<u32> = is_default
        .iter()
        .map(|&defaulted| {
            if defaulted {
                dpd_default.sample(&mut rng)
            } else {
                dpd_performing.sample(&mut rng)
            }
        })
        .collect();

    let noise = sample_vec(
        &mut rng,
        &Uniform::new_inclusive(config.provision_noise_low, config.provision_noise_high),
        n,
    );

    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let seg = segment[i].index();
        let pd = pd_1y[i];

        let collateral_value = if has_collateral[i] {
            ead[i] / ltv_targets[seg][i]
        } else {
            0.0
        };
        let ltv = (collateral_value > 0.0).then(|| ead[i] / collateral_value);

        let expected_loss = pd * lgd[i] * ead[i];
        let internal_rating = InternalRating::from_pd(pd)
            .ok_or_else(|| AppError::new(4, format!("Loan {}: PD {pd} outside [0, 1].", i + 1)))?;

        records.push(LoanRecord {
            loan_id: i as u64 + 1,
            borrower_id: borrower_id[i],
            segment: segment[i],
            country: country[i],
            origination_date: origination_date[i],
            maturity_date: maturity_date[i],
            currency: currency[i],
            interest_rate: config.base_rate + spreads[seg][i],
            pd_1y: pd,
            lgd: lgd[i],
            ead: ead[i],
            has_collateral: has_collateral[i],
            collateral_value,
            ltv,
            is_default: is_default[i],
            default_date: default_date[i],
            days_past_due: days_past_due[i],
            expected_loss,
            provision_amount: expected_loss * noise[i],
            internal_rating,
        });
    }

    debug!(
        loans = records.len(),
        defaults = records.iter().filter(|r| r.is_default).count(),
        "loan portfolio generated"
    );

    Ok(records)
}

/// Check the request and parameters before touching the RNG.
///
/// Returns the loan count as `usize`.
fn validate_config(config: &PortfolioConfig) -> Result<usize, AppError> {
    if config.loan_count < 0 {
        return Err(AppError::new(
            2,
            format!("Loan count must be >= 0 (got {}).", config.loan_count),
        ));
    }
    if config.loan_count > MAX_LOANS {
        return Err(AppError::new(
            2,
            format!(
                "Loan count must be <= {MAX_LOANS} to fit one worksheet (got {}).",
                config.loan_count
            ),
        ));
    }
    let n = usize::try_from(config.loan_count)
        .map_err(|_| AppError::new(2, format!("Loan count {} is too large.", config.loan_count)))?;

    for seg in Segment::ALL {
        let p = config.segment(seg);
        let name = seg.as_str();
        if !(p.weight.is_finite() && p.weight >= 0.0) {
            return Err(AppError::new(2, format!("{name} segment weight must be >= 0.")));
        }
        if !(p.spread_mean.is_finite() && p.spread_sd.is_finite() && p.spread_sd >= 0.0) {
            return Err(AppError::new(2, format!("Invalid {name} spread parameters.")));
        }
        if !(p.pd_alpha > 0.0 && p.pd_beta > 0.0) {
            return Err(AppError::new(2, format!("{name} PD Beta parameters must be > 0.")));
        }
        if !(p.ltv_low.is_finite() && p.ltv_high.is_finite() && p.ltv_low > 0.0 && p.ltv_high >= p.ltv_low) {
            return Err(AppError::new(2, format!("Invalid {name} target LTV range.")));
        }
    }

    if config.origination_window_days <= 0 {
        return Err(AppError::new(2, "Origination window must be > 0 days."));
    }
    if config.maturity_years_min < 1 || config.maturity_years_max < config.maturity_years_min {
        return Err(AppError::new(2, "Maturity term range must satisfy 1 <= min <= max."));
    }
    if config.countries.is_empty() {
        return Err(AppError::new(2, "At least one country is required."));
    }
    if !(config.lgd_low.is_finite()
        && config.lgd_high.is_finite()
        && config.lgd_low >= 0.0
        && config.lgd_high <= 1.0
        && config.lgd_low <= config.lgd_high)
    {
        return Err(AppError::new(2, "LGD range must lie within [0, 1]."));
    }
    if !(config.ead_log_mu.is_finite() && config.ead_log_sigma.is_finite() && config.ead_log_sigma >= 0.0) {
        return Err(AppError::new(2, "Invalid EAD log-normal parameters."));
    }
    if !(0.0..=1.0).contains(&config.collateral_probability) {
        return Err(AppError::new(2, "Collateral probability must lie within [0, 1]."));
    }
    if config.dpd_default_min > config.dpd_default_max
        || config.dpd_performing_min > config.dpd_performing_max
    {
        return Err(AppError::new(2, "Invalid days-past-due range."));
    }
    if !(config.provision_noise_low.is_finite()
        && config.provision_noise_high.is_finite()
        && config.provision_noise_low <= config.provision_noise_high)
    {
        return Err(AppError::new(2, "Invalid provision noise range."));
    }

    Ok(n)
}

fn sample_vec<T, D: Distribution<T>>(rng: &mut StdRng, dist: &D, n: usize) -> Vec<T> {
    (0..n).map(|_| dist.sample(rng)).collect()
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, AppError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AppError::new(2, format!("Date {date} shifted by {days} days is out of range.")))
}

/// Uniform date in `[start, end]`, or `None` when `end <= start` (no draw is made).
fn draw_default_date(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> Result<Option<NaiveDate>, AppError> {
    if end <= start {
        return Ok(None);
    }
    let window = (end - start).num_days();
    let offset = rng.gen_range(0..=window);
    shift_days(start, offset).map(Some)
}
