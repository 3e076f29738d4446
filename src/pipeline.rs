//! End-to-end batch run: load -> clean -> dedup -> aggregate -> write.
//! Each stage consumes the full output of the previous one. The run is
//! synchronous and idempotent on retry: the input is never touched and the
//! output lands under a fresh timestamped directory every time.

use crate::error::ReportError;
use crate::types::{MonthlySummaryRow, RunSummary};
use crate::{loader, output, reports, transform};
use log::info;
use std::path::Path;

/// Generate the monthly report from the first readable of the two input
/// sources, publishing it under `dest`. Returns the run summary together
/// with the rows that were written.
pub fn generate_report(
    primary: &Path,
    fallback: &Path,
    dest: &Path,
) -> Result<(RunSummary, Vec<MonthlySummaryRow>), ReportError> {
    let raw = loader::load_raw(primary, fallback)?;

    let (clean, transform_report) = transform::clean(&raw);
    let (clean, duplicates_removed) = transform::dedup(clean);

    let rows = reports::monthly_summary(&clean);
    info!("aggregated {} clean rows into {} months", clean.len(), rows.len());

    let output_file = output::write_report(dest, &rows)?;

    let summary = RunSummary {
        source: raw.source,
        fallback_used: raw.fallback_used,
        rows_read: transform_report.input_rows,
        rows_unreadable: raw.rows_unreadable,
        rows_dropped_parse: transform_report.dropped_parse,
        rows_dropped_filter: transform_report.dropped_filter,
        duplicates_removed,
        clean_rows: clean.len(),
        anonymous_customer_rows: transform_report.defaulted_customers,
        months: rows.len(),
        output_file,
    };
    Ok((summary, rows))
}
