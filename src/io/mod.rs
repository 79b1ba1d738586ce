//! Output writers.
//!
//! - CSV rendering (`delimited`)
//! - XLSX rendering (`workbook`)
//! - directory creation + atomic placement of both files (`export`)

pub mod delimited;
pub mod export;
pub mod workbook;

pub use delimited::*;
pub use export::*;
pub use workbook::*;
