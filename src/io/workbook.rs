//! Spreadsheet (XLSX) rendering of the portfolio.
//!
//! One worksheet, a bold header row, then one row per loan. Numbers are
//! numeric cells, dates are real date cells shown as `yyyy-mm-dd`, and missing
//! values are left blank.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::domain::{LOAN_COLUMNS, LoanRecord, MAX_LOANS};
use crate::error::AppError;

pub const SHEET_NAME: &str = "loan_portfolio";

/// Render the workbook to an in-memory XLSX file.
///
/// Fails before building anything if the rows cannot fit one worksheet.
pub fn render_loans_xlsx(records: &[LoanRecord]) -> Result<Vec<u8>, AppError> {
    if records.len() as u64 > MAX_LOANS as u64 {
        return Err(AppError::new(
            2,
            format!("Too many rows for a worksheet: {} (max {MAX_LOANS}).", records.len()),
        ));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    for (col, name) in LOAN_COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, &header)
            .map_err(xlsx_error)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = u32::try_from(i + 1)
            .map_err(|_| AppError::new(2, format!("Too many rows for a worksheet: {}", records.len())))?;
        write_row(sheet, row, record, &date).map_err(|e| {
            AppError::new(2, format!("Failed to write XLSX row for loan {}: {e}", record.loan_id))
        })?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn write_row(sheet: &mut Worksheet, row: u32, r: &LoanRecord, date: &Format) -> Result<(), XlsxError> {
    sheet.write_number(row, 0, r.loan_id as f64)?;
    sheet.write_number(row, 1, r.borrower_id as f64)?;
    sheet.write_string(row, 2, r.segment.as_str())?;
    sheet.write_string(row, 3, r.country.as_str())?;
    sheet.write_datetime_with_format(row, 4, &r.origination_date, date)?;
    sheet.write_datetime_with_format(row, 5, &r.maturity_date, date)?;
    sheet.write_string(row, 6, r.currency.as_str())?;
    sheet.write_number(row, 7, r.interest_rate)?;
    sheet.write_number(row, 8, r.pd_1y)?;
    sheet.write_number(row, 9, r.lgd)?;
    sheet.write_number(row, 10, r.ead)?;
    sheet.write_boolean(row, 11, r.has_collateral)?;
    sheet.write_number(row, 12, r.collateral_value)?;
    if let Some(ltv) = r.ltv {
        sheet.write_number(row, 13, ltv)?;
    }
    sheet.write_boolean(row, 14, r.is_default)?;
    if let Some(default_date) = &r.default_date {
        sheet.write_datetime_with_format(row, 15, default_date, date)?;
    }
    sheet.write_number(row, 16, r.days_past_due)?;
    sheet.write_number(row, 17, r.expected_loss)?;
    sheet.write_number(row, 18, r.provision_amount)?;
    sheet.write_string(row, 19, r.internal_rating.as_str())?;
    Ok(())
}

fn xlsx_error(e: XlsxError) -> AppError {
    AppError::new(2, format!("Failed to build XLSX workbook: {e}"))
}
