//! Shared domain types.
//!
//! The portfolio is a plain `Vec<LoanRecord>`: one strongly typed row per loan,
//! with `Option` wherever a value is genuinely missing (`ltv`, `default_date`).
//! Everything the generator draws from is described by `PortfolioConfig`.

use chrono::NaiveDate;
use serde::Serialize;

/// Business segment of the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Segment {
    Retail,
    #[serde(rename = "SME")]
    Sme,
    Corporate,
}

impl Segment {
    /// Fixed order; draws and weights are indexed by it.
    pub const ALL: [Segment; 3] = [Segment::Retail, Segment::Sme, Segment::Corporate];

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Retail => "Retail",
            Segment::Sme => "SME",
            Segment::Corporate => "Corporate",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Segment::Retail => 0,
            Segment::Sme => 1,
            Segment::Corporate => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Country {
    DE,
    FR,
    IT,
    ES,
    NL,
}

impl Country {
    pub const ALL: [Country; 5] = [Country::DE, Country::FR, Country::IT, Country::ES, Country::NL];

    pub fn as_str(self) -> &'static str {
        match self {
            Country::DE => "DE",
            Country::FR => "FR",
            Country::IT => "IT",
            Country::ES => "ES",
            Country::NL => "NL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Currency {
    EUR,
    USD,
    GBP,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::EUR, Currency::USD, Currency::GBP];

    pub fn as_str(self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
        }
    }
}

/// Internal rating bucket, derived from the one-year PD only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum InternalRating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    A,
    #[serde(rename = "BBB")]
    Bbb,
    #[serde(rename = "BB/B")]
    BbOrBelow,
}

/// Upper (exclusive) PD bound of every bucket but the last, which is closed at 1.0.
const RATING_UPPER_BOUNDS: [(f64, InternalRating); 4] = [
    (0.005, InternalRating::Aaa),
    (0.01, InternalRating::Aa),
    (0.02, InternalRating::A),
    (0.05, InternalRating::Bbb),
];

impl InternalRating {
    pub const ALL: [InternalRating; 5] = [
        InternalRating::Aaa,
        InternalRating::Aa,
        InternalRating::A,
        InternalRating::Bbb,
        InternalRating::BbOrBelow,
    ];

    /// Bucket a PD: `[0, 0.5%)` AAA, `[0.5%, 1%)` AA, `[1%, 2%)` A,
    /// `[2%, 5%)` BBB, `[5%, 100%]` BB/B.
    ///
    /// Returns `None` for NaN or a PD outside `[0, 1]`.
    pub fn from_pd(pd: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&pd) {
            return None;
        }
        let rating = RATING_UPPER_BOUNDS
            .iter()
            .find(|(upper, _)| pd < *upper)
            .map(|(_, rating)| *rating)
            .unwrap_or(InternalRating::BbOrBelow);
        Some(rating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InternalRating::Aaa => "AAA",
            InternalRating::Aa => "AA",
            InternalRating::A => "A",
            InternalRating::Bbb => "BBB",
            InternalRating::BbOrBelow => "BB/B",
        }
    }
}

/// Largest portfolio that fits one worksheet: 1,048,576 rows minus the header.
pub const MAX_LOANS: i64 = 1_048_575;

/// Output column names, in the order every writer emits them.
pub const LOAN_COLUMNS: [&str; 20] = [
    "loan_id",
    "borrower_id",
    "segment",
    "country",
    "origination_date",
    "maturity_date",
    "currency",
    "interest_rate",
    "pd_1y",
    "lgd",
    "ead",
    "has_collateral",
    "collateral_value",
    "ltv",
    "is_default",
    "default_date",
    "days_past_due",
    "expected_loss",
    "provision_amount",
    "internal_rating",
];

/// One generated loan.
///
/// Field order matches `LOAN_COLUMNS`; the CSV writer relies on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRecord {
    pub loan_id: u64,
    pub borrower_id: u64,
    pub segment: Segment,
    pub country: Country,
    pub origination_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub currency: Currency,
    pub interest_rate: f64,
    pub pd_1y: f64,
    pub lgd: f64,
    pub ead: f64,
    pub has_collateral: bool,
    /// `0.0` for unsecured loans.
    pub collateral_value: f64,
    /// `ead / collateral_value`; missing for unsecured loans.
    pub ltv: Option<f64>,
    pub is_default: bool,
    /// Missing unless defaulted with a non-empty origination..min(as-of, maturity) window.
    pub default_date: Option<NaiveDate>,
    pub days_past_due: u32,
    pub expected_loss: f64,
    pub provision_amount: f64,
    pub internal_rating: InternalRating,
}

/// Per-segment distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentParams {
    /// Relative weight in the segment mix.
    pub weight: f64,
    /// Spread over the base rate ~ Normal(mean, sd).
    pub spread_mean: f64,
    pub spread_sd: f64,
    /// One-year PD ~ Beta(alpha, beta).
    pub pd_alpha: f64,
    pub pd_beta: f64,
    /// Target LTV ~ Uniform[low, high] for collateralised loans.
    pub ltv_low: f64,
    pub ltv_high: f64,
}

/// Everything a generation run depends on.
///
/// `Default` reproduces the reference portfolio (1000 loans, seed 42, as-of 2025-01-01).
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    /// Signed so that a negative request can be rejected rather than wrapped.
    pub loan_count: i64,
    /// Any integer; reinterpreted bit-for-bit as the `u64` RNG seed.
    pub seed: i64,
    /// "Today" for origination and default-date windows.
    pub reference_date: NaiveDate,

    pub retail: SegmentParams,
    pub sme: SegmentParams,
    pub corporate: SegmentParams,

    pub base_rate: f64,
    /// Origination offset (days before the reference date) is drawn from `[0, origination_window_days)`.
    pub origination_window_days: i64,
    /// Maturity is origination + years * 365 days, years drawn from `[min, max]`.
    pub maturity_years_min: i64,
    pub maturity_years_max: i64,

    pub countries: Vec<Country>,
    pub currency_weights: [f64; 3],

    pub lgd_low: f64,
    pub lgd_high: f64,
    /// EAD ~ LogNormal(mu, sigma).
    pub ead_log_mu: f64,
    pub ead_log_sigma: f64,

    pub collateral_probability: f64,

    pub dpd_default_min: u32,
    pub dpd_default_max: u32,
    pub dpd_performing_min: u32,
    pub dpd_performing_max: u32,

    pub provision_noise_low: f64,
    pub provision_noise_high: f64,
}

impl PortfolioConfig {
    pub fn segment(&self, segment: Segment) -> &SegmentParams {
        match segment {
            Segment::Retail => &self.retail,
            Segment::Sme => &self.sme,
            Segment::Corporate => &self.corporate,
        }
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            loan_count: 1000,
            seed: 42,
            reference_date: default_reference_date(),

            retail: SegmentParams {
                weight: 0.5,
                spread_mean: 0.02,
                spread_sd: 0.005,
                pd_alpha: 1.5,
                pd_beta: 40.0,
                ltv_low: 0.3,
                ltv_high: 0.8,
            },
            sme: SegmentParams {
                weight: 0.3,
                spread_mean: 0.03,
                spread_sd: 0.007,
                pd_alpha: 2.0,
                pd_beta: 25.0,
                ltv_low: 0.4,
                ltv_high: 0.9,
            },
            corporate: SegmentParams {
                weight: 0.2,
                spread_mean: 0.015,
                spread_sd: 0.004,
                pd_alpha: 1.2,
                pd_beta: 35.0,
                ltv_low: 0.2,
                ltv_high: 0.9,
            },

            base_rate: 0.02,
            origination_window_days: 5 * 365,
            maturity_years_min: 1,
            maturity_years_max: 9,

            countries: Country::ALL.to_vec(),
            currency_weights: [0.8, 0.15, 0.05],

            lgd_low: 0.2,
            lgd_high: 0.7,
            ead_log_mu: 10.0,
            ead_log_sigma: 1.0,

            collateral_probability: 0.7,

            dpd_default_min: 90,
            dpd_default_max: 360,
            dpd_performing_min: 0,
            dpd_performing_max: 29,

            provision_noise_low: 0.8,
            provision_noise_high: 1.2,
        }
    }
}

/// 2025-01-01.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_buckets_follow_pd_boundaries() {
        assert_eq!(InternalRating::from_pd(0.003), Some(InternalRating::Aaa));
        assert_eq!(InternalRating::from_pd(0.03), Some(InternalRating::Bbb));
        assert_eq!(InternalRating::from_pd(0.5), Some(InternalRating::BbOrBelow));
    }

    #[test]
    fn rating_boundaries_are_left_closed() {
        assert_eq!(InternalRating::from_pd(0.0), Some(InternalRating::Aaa));
        assert_eq!(InternalRating::from_pd(0.005), Some(InternalRating::Aa));
        assert_eq!(InternalRating::from_pd(0.01), Some(InternalRating::A));
        assert_eq!(InternalRating::from_pd(0.02), Some(InternalRating::Bbb));
        assert_eq!(InternalRating::from_pd(0.05), Some(InternalRating::BbOrBelow));
        assert_eq!(InternalRating::from_pd(1.0), Some(InternalRating::BbOrBelow));
    }

    #[test]
    fn rating_rejects_out_of_range_pd() {
        assert_eq!(InternalRating::from_pd(-0.01), None);
        assert_eq!(InternalRating::from_pd(1.5), None);
        assert_eq!(InternalRating::from_pd(f64::NAN), None);
    }

    #[test]
    fn default_config_weights_sum_to_one() {
        let config = PortfolioConfig::default();
        let segments: f64 = Segment::ALL.iter().map(|s| config.segment(*s).weight).sum();
        let currencies: f64 = config.currency_weights.iter().sum();
        assert!((segments - 1.0).abs() < 1e-12);
        assert!((currencies - 1.0).abs() < 1e-12);
        assert_eq!(config.reference_date.to_string(), "2025-01-01");
    }

    #[test]
    fn column_list_matches_labels() {
        assert_eq!(LOAN_COLUMNS.len(), 20);
        assert_eq!(LOAN_COLUMNS[0], "loan_id");
        assert_eq!(LOAN_COLUMNS[19], "internal_rating");
        assert_eq!(Segment::Sme.as_str(), "SME");
        assert_eq!(InternalRating::BbOrBelow.as_str(), "BB/B");
    }
}
