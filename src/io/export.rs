//! Write the portfolio to disk in both output formats.
//!
//! Both files are rendered and staged as temporary files inside the
//! destination directory before either final path is touched. Only then are
//! they renamed into place; if the second rename fails the first output is
//! removed again, so a failed run leaves neither `loan_portfolio.*` behind.

use std::fs::{create_dir_all, remove_file};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::domain::LoanRecord;
use crate::error::AppError;
use crate::io::delimited::write_loans_csv;
use crate::io::workbook::render_loans_xlsx;

pub const CSV_FILE_NAME: &str = "loan_portfolio.csv";
pub const XLSX_FILE_NAME: &str = "loan_portfolio.xlsx";

/// Paths of the files produced by `write_portfolio`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

/// Create `out_dir` if needed and write `loan_portfolio.csv` and `loan_portfolio.xlsx` into it.
pub fn write_portfolio(records: &[LoanRecord], out_dir: &Path) -> Result<WrittenFiles, AppError> {
    // Render first: the workbook is the step most likely to reject the data.
    let bytes = render_loans_xlsx(records)?;

    create_dir_all(out_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output directory '{}': {e}", out_dir.display()))
    })?;

    let csv = out_dir.join(CSV_FILE_NAME);
    let xlsx = out_dir.join(XLSX_FILE_NAME);

    let staged_csv = stage(&csv, |file| {
        let mut buffered = BufWriter::new(file);
        write_loans_csv(&mut buffered, records)?;
        buffered
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", csv.display())))
    })?;
    let staged_xlsx = stage(&xlsx, |file| {
        file.write_all(&bytes)
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", xlsx.display())))
    })?;

    commit(staged_csv, &csv)?;
    if let Err(err) = commit(staged_xlsx, &xlsx) {
        if let Err(e) = remove_file(&csv) {
            warn!(path = %csv.display(), error = %e, "failed to remove CSV after XLSX error");
        }
        return Err(err);
    }

    info!(path = %csv.display(), rows = records.len(), "wrote CSV");
    info!(path = %xlsx.display(), rows = records.len(), bytes = bytes.len(), "wrote XLSX");

    Ok(WrittenFiles { csv, xlsx })
}

/// Run `fill` against a synced temp file next to `path`.
///
/// The temp file is deleted when dropped without being committed.
fn stage<F>(path: &Path, fill: F) -> Result<NamedTempFile, AppError>
where
    F: FnOnce(&mut std::fs::File) -> Result<(), AppError>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        AppError::new(2, format!("Failed to create temporary file in '{}': {e}", dir.display()))
    })?;

    fill(tmp.as_file_mut())?;

    tmp.as_file()
        .sync_all()
        .map_err(|e| AppError::new(2, format!("Failed to sync '{}': {e}", path.display())))?;
    Ok(tmp)
}

fn commit(tmp: NamedTempFile, path: &Path) -> Result<(), AppError> {
    tmp.persist(path)
        .map_err(|e| AppError::new(2, format!("Failed to move output into '{}': {}", path.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use calamine::{Data, DataType, Reader, Xlsx, open_workbook};

    use super::*;
    use crate::data::generate_portfolio;
    use crate::domain::{LOAN_COLUMNS, PortfolioConfig};
    use crate::io::workbook::SHEET_NAME;

    fn loans(n: i64) -> Vec<LoanRecord> {
        let config = PortfolioConfig {
            loan_count: n,
            ..PortfolioConfig::default()
        };
        generate_portfolio(&config).unwrap()
    }

    fn close(cell: Option<f64>, expected: f64) -> bool {
        cell.is_some_and(|v| (v - expected).abs() <= 1e-12 * expected.abs().max(1.0))
    }

    fn read_sheet(path: &Path) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        workbook.worksheet_range(SHEET_NAME).unwrap()
    }

    #[test]
    fn creates_missing_directory_and_both_files() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = root.path().join("nested").join("data");
        let records = loans(120);

        let written = write_portfolio(&records, &out_dir).unwrap();
        assert_eq!(written.csv, out_dir.join(CSV_FILE_NAME));
        assert_eq!(written.xlsx, out_dir.join(XLSX_FILE_NAME));

        let mut reader = csv::Reader::from_path(&written.csv).unwrap();
        assert_eq!(reader.headers().unwrap().len(), LOAN_COLUMNS.len());
        assert_eq!(reader.records().count(), records.len());

        let sheet = read_sheet(&written.xlsx);
        assert_eq!(sheet.height(), records.len() + 1);

        // Only the two outputs remain; temp files were renamed away.
        let entries = std::fs::read_dir(&out_dir).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn workbook_matches_records_cell_by_cell() {
        let root = tempfile::tempdir().unwrap();
        let records = loans(500);
        assert!(records.iter().any(|r| r.ltv.is_none()));
        assert!(records.iter().any(|r| r.default_date.is_some()));

        let written = write_portfolio(&records, root.path()).unwrap();
        let sheet = read_sheet(&written.xlsx);
        let rows: Vec<&[Data]> = sheet.rows().collect();
        assert_eq!(rows.len(), records.len() + 1);

        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, LOAN_COLUMNS);

        for (row, loan) in rows[1..].iter().zip(&records) {
            assert_eq!(row.len(), LOAN_COLUMNS.len());
            assert_eq!(row[0].as_f64(), Some(loan.loan_id as f64));
            assert_eq!(row[2].to_string(), loan.segment.as_str());
            assert!(close(row[8].as_f64(), loan.pd_1y), "pd_1y {:?}", row[8]);
            assert_eq!(row[19].to_string(), loan.internal_rating.as_str());

            for (col, expected) in [(4, Some(loan.origination_date)), (5, Some(loan.maturity_date)), (15, loan.default_date)] {
                match (&row[col], expected) {
                    (Data::DateTime(dt), Some(date)) => {
                        assert!(dt.is_datetime());
                        assert_eq!(dt.as_f64().fract(), 0.0, "time part in column {col}");
                        assert_eq!(row[col].as_date(), Some(date));
                    }
                    (Data::Empty, None) => {}
                    (cell, expected) => panic!("column {col}: cell {cell:?}, expected {expected:?}"),
                }
            }

            assert_eq!(matches!(row[13], Data::Empty), loan.ltv.is_none());
            if let Some(ltv) = loan.ltv {
                assert!(close(row[13].as_f64(), ltv), "ltv {:?}", row[13]);
            }
        }
    }

    #[test]
    fn empty_portfolio_writes_header_only_files() {
        let root = tempfile::tempdir().unwrap();
        let written = write_portfolio(&[], root.path()).unwrap();
        let text = std::fs::read_to_string(&written.csv).unwrap();
        assert_eq!(text.trim_end(), LOAN_COLUMNS.join(","));

        let sheet = read_sheet(&written.xlsx);
        assert_eq!(sheet.height(), 1);
        assert_eq!(sheet.width(), LOAN_COLUMNS.len());
    }

    #[test]
    fn rewriting_replaces_previous_files() {
        let root = tempfile::tempdir().unwrap();
        write_portfolio(&loans(50), root.path()).unwrap();
        let written = write_portfolio(&loans(10), root.path()).unwrap();
        let mut reader = csv::Reader::from_path(&written.csv).unwrap();
        assert_eq!(reader.records().count(), 10);
        assert_eq!(read_sheet(&written.xlsx).height(), 11);
    }

    #[test]
    fn failed_xlsx_leaves_no_csv_behind() {
        let root = tempfile::tempdir().unwrap();
        // A directory squatting on the XLSX path makes the final rename fail.
        std::fs::create_dir(root.path().join(XLSX_FILE_NAME)).unwrap();

        let err = write_portfolio(&loans(20), root.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!root.path().join(CSV_FILE_NAME).exists());

        // Nothing but the squatting directory: no CSV, no stray temp files.
        let entries = std::fs::read_dir(root.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn uncreatable_directory_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = write_portfolio(&loans(5), &blocker.join("data")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("output directory"), "{err}");
    }
}
