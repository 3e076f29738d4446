//! Transform stage and deduplicator: raw text rows in, validated
//! `CleanRecord`s out, with every drop accounted for.

use crate::loader::RawTable;
use crate::types::{CleanRecord, RawRow, ANONYMOUS_CUSTOMER_ID};
use crate::util::{month_key, parse_f64_safe, parse_i64_safe, parse_invoice_date};
use log::info;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    pub input_rows: usize,
    /// Rows dropped because the date or a numeric field would not parse.
    pub dropped_parse: usize,
    /// Rows dropped by the quantity/price filter.
    pub dropped_filter: usize,
    /// Rows kept with the sentinel customer id substituted.
    pub defaulted_customers: usize,
}

/// Clean and type every raw row. Row order in the output is not meaningful.
///
/// A row survives only if its date, quantity and unit price all parse and
/// `quantity > 0 && unit_price > 0`. A blank or malformed `CustomerID` never
/// drops a row; it becomes the anonymous sentinel instead.
pub fn clean(raw: &RawTable) -> (Vec<CleanRecord>, TransformReport) {
    let mut report = TransformReport::default();
    let mut out: Vec<CleanRecord> = Vec::with_capacity(raw.rows.len());

    for record in &raw.rows {
        report.input_rows += 1;
        let row: RawRow = match record.deserialize(Some(&raw.headers)) {
            Ok(r) => r,
            Err(_) => {
                report.dropped_parse += 1;
                continue;
            }
        };

        let invoice_date = match parse_invoice_date(row.invoice_date.as_deref()) {
            Some(d) => d,
            None => {
                report.dropped_parse += 1;
                continue;
            }
        };
        let unit_price = match parse_f64_safe(row.unit_price.as_deref()) {
            Some(p) => p,
            None => {
                report.dropped_parse += 1;
                continue;
            }
        };
        let quantity = match parse_i64_safe(row.quantity.as_deref()) {
            Some(q) => q,
            None => {
                report.dropped_parse += 1;
                continue;
            }
        };
        // Missing and malformed ids are treated identically, as the report
        // consumers expect. The substitution count is surfaced so they can
        // see how much of the data is anonymous.
        let customer_id = match parse_i64_safe(row.customer_id.as_deref()) {
            Some(c) => c,
            None => {
                report.defaulted_customers += 1;
                ANONYMOUS_CUSTOMER_ID
            }
        };

        if quantity <= 0 || unit_price <= 0.0 {
            report.dropped_filter += 1;
            continue;
        }

        let stock_code = row.stock_code.unwrap_or_default().trim().to_string();
        out.push(CleanRecord {
            invoice_date,
            stock_code,
            quantity,
            unit_price,
            customer_id,
            invoice_month: month_key(invoice_date),
            total_sales: quantity as f64 * unit_price,
        });
    }

    info!(
        "cleaned {} rows ({} parse drops, {} filtered, {} anonymous)",
        out.len(),
        report.dropped_parse,
        report.dropped_filter,
        report.defaulted_customers
    );
    (out, report)
}

/// Remove rows that are field-for-field identical to an earlier one,
/// derived fields included. Idempotent.
pub fn dedup(records: Vec<CleanRecord>) -> (Vec<CleanRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<CleanRecord> = HashSet::with_capacity(before);
    let mut out: Vec<CleanRecord> = Vec::with_capacity(before);
    for record in records {
        if seen.insert(record.clone()) {
            out.push(record);
        }
    }
    let removed = before - out.len();
    if removed > 0 {
        info!("removed {} exact duplicate rows", removed);
    }
    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::infer_schema;
    use csv::StringRecord;

    fn table(rows: &[&[&str]]) -> RawTable {
        let headers = StringRecord::from(vec![
            "InvoiceNo",
            "StockCode",
            "Quantity",
            "InvoiceDate",
            "UnitPrice",
            "CustomerID",
        ]);
        let rows: Vec<StringRecord> = rows
            .iter()
            .map(|r| StringRecord::from(r.to_vec()))
            .collect();
        let schema = infer_schema(&headers, &rows);
        RawTable {
            headers,
            rows,
            schema,
            source: "test.csv".into(),
            fallback_used: false,
            rows_unreadable: 0,
        }
    }

    #[test]
    fn valid_rows_get_typed_and_derived_fields() {
        let t = table(&[&["536365", "85123A", "6", "12/1/2010 08:26", "2.55", "17850"]]);
        let (clean, report) = clean(&t);
        assert_eq!(clean.len(), 1);
        let r = &clean[0];
        assert_eq!(r.stock_code, "85123A");
        assert_eq!(r.quantity, 6);
        assert_eq!(r.customer_id, 17850);
        assert_eq!(r.invoice_month, "2010-12");
        assert!((r.total_sales - 15.3).abs() < 1e-9);
        assert_eq!(report.dropped_parse, 0);
        assert_eq!(report.dropped_filter, 0);
    }

    #[test]
    fn bad_dates_and_numbers_drop_the_row_and_are_counted() {
        let t = table(&[
            &["1", "A1", "6", "not a date", "2.55", "17850"],
            &["2", "A1", "six", "12/1/2010 08:26", "2.55", "17850"],
            &["3", "A1", "6", "12/1/2010 08:26", "cheap", "17850"],
            &["4", "A1", "6", "12/1/2010 08:26", "2.55", "17850"],
        ]);
        let (clean, report) = clean(&t);
        assert_eq!(clean.len(), 1);
        assert_eq!(report.dropped_parse, 3);
    }

    #[test]
    fn blank_and_malformed_customer_ids_both_get_the_sentinel() {
        let t = table(&[
            &["1", "A1", "6", "12/1/2010 08:26", "2.55", ""],
            &["2", "B2", "2", "12/1/2010 09:00", "1.00", "not-a-number"],
        ]);
        let (clean, report) = clean(&t);
        assert_eq!(clean.len(), 2);
        assert!(clean.iter().all(|r| r.customer_id == ANONYMOUS_CUSTOMER_ID));
        assert_eq!(report.defaulted_customers, 2);
    }

    #[test]
    fn nonpositive_quantity_or_price_is_filtered_not_a_parse_error() {
        let t = table(&[
            &["1", "A1", "-3", "12/1/2010 08:34", "1.00", "17850"],
            &["2", "A1", "6", "12/1/2010 08:34", "0", "17850"],
        ]);
        let (clean, report) = clean(&t);
        assert!(clean.is_empty());
        assert_eq!(report.dropped_filter, 2);
        assert_eq!(report.dropped_parse, 0);
    }

    #[test]
    fn dedup_removes_exact_duplicates_and_is_idempotent() {
        let t = table(&[
            &["1", "A1", "6", "12/1/2010 08:26", "2.55", "17850"],
            &["1", "A1", "6", "12/1/2010 08:26", "2.55", "17850"],
            &["2", "A1", "6", "12/1/2010 08:26", "2.55", "17851"],
        ]);
        let (clean, _) = clean(&t);
        let (once, removed) = dedup(clean);
        assert_eq!(removed, 1);
        assert_eq!(once.len(), 2);
        let (twice, removed_again) = dedup(once.clone());
        assert_eq!(removed_again, 0);
        assert_eq!(twice, once);
    }
}
