//! `loan-portfolio` library crate.
//!
//! The binary (`loanport`) is a thin wrapper around this library so that:
//!
//! - generation is testable without spawning processes
//! - the generator can be reused directly (notebooks, other tools)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
