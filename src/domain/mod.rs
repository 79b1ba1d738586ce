//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - categorical attributes (`Segment`, `Country`, `Currency`, `InternalRating`)
//! - the generated row (`LoanRecord`) and its column order (`LOAN_COLUMNS`)
//! - generation parameters (`SegmentParams`, `PortfolioConfig`)

pub mod types;

pub use types::*;
