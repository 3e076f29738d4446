//! Report writer: one CSV file in a fresh timestamped directory, staged
//! in a hidden directory and renamed into place so readers never see a
//! half-written report.

use crate::error::ReportError;
use crate::types::MonthlySummaryRow;
use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

const REPORT_FILE: &str = "monthly_summary.csv";

fn write_err(path: &Path, source: csv::Error) -> ReportError {
    ReportError::Write { path: path.to_path_buf(), source }
}

/// Write the summary rows, in the given order, under
/// `<dest>/report-<timestamp>/` and return the path of the published file.
pub fn write_report(dest: &Path, rows: &[MonthlySummaryRow]) -> Result<PathBuf, ReportError> {
    let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let final_dir = dest.join(format!("report-{stamp}"));
    let staging_dir = dest.join(format!(".report-{stamp}.tmp"));

    fs::create_dir_all(&staging_dir).map_err(|e| write_err(&staging_dir, e.into()))?;
    let staged_file = staging_dir.join(REPORT_FILE);
    {
        let mut wtr = csv::Writer::from_path(&staged_file).map_err(|e| write_err(&staged_file, e))?;
        if rows.is_empty() {
            // serialize() only emits the header alongside a first row, so an
            // empty report needs it spelled out.
            wtr.write_record([
                "InvoiceMonthYear",
                "total_products_sold",
                "total_quantity",
                "total_sales",
                "customers_bought",
                "customers_who_bought_nothing",
            ])
            .map_err(|e| write_err(&staged_file, e))?;
        }
        for row in rows {
            wtr.serialize(row).map_err(|e| write_err(&staged_file, e))?;
        }
        wtr.flush().map_err(|e| write_err(&staged_file, csv::Error::from(e)))?;
    }
    // Publish. A failed rename leaves only the dot-prefixed staging dir
    // behind, never an ambiguous report directory.
    fs::rename(&staging_dir, &final_dir).map_err(|e| write_err(&final_dir, e.into()))?;

    let published = final_dir.join(REPORT_FILE);
    info!("report saved to {}", published.display());
    Ok(published)
}

/// Markdown-style console preview of the first `max_rows` rows.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
