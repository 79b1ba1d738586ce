//! Delimited-text (CSV) rendering of the portfolio.
//!
//! The header is written explicitly so an empty portfolio still produces the
//! full column set. Rows go through serde: dates render as `YYYY-MM-DD`,
//! missing values as empty fields.

use std::io::Write;

use crate::domain::{LOAN_COLUMNS, LoanRecord};
use crate::error::AppError;

/// Write the header plus one row per loan to `out`.
pub fn write_loans_csv<W: Write>(out: W, records: &[LoanRecord]) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

    writer
        .write_record(LOAN_COLUMNS)
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    for record in records {
        writer.serialize(record).map_err(|e| {
            AppError::new(2, format!("Failed to write CSV row for loan {}: {e}", record.loan_id))
        })?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV output: {e}")))?;
    Ok(())
}
