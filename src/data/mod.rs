//! Portfolio data sources.
//!
//! - synthetic loan portfolio generation (`portfolio`)

pub mod portfolio;

pub use portfolio::*;
