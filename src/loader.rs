//! Row ingestor: two-candidate source resolution, raw CSV read, and
//! column type inference over the full scan.

use crate::error::ReportError;
use crate::util::{parse_f64_safe, parse_i64_safe, parse_invoice_date};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Narrowest type consistent with every non-empty value in a column.
/// Widening order: Integer < Float < Text and Date < Text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Date,
    Text,
}

/// Untyped CSV contents plus everything the later stages need to know about
/// where they came from.
#[derive(Debug)]
pub struct RawTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    pub schema: Vec<(String, ColumnType)>,
    pub source: PathBuf,
    pub fallback_used: bool,
    /// Records the CSV reader itself could not produce (bad quoting, invalid
    /// UTF-8). Dropped, not fatal.
    pub rows_unreadable: usize,
}

/// Try the primary source first; on any access failure fall back to the
/// secondary. Both unreadable is fatal.
pub fn resolve_source(primary: &Path, fallback: &Path) -> Result<(File, PathBuf, bool), ReportError> {
    match File::open(primary) {
        Ok(f) => {
            info!("reading primary source {}", primary.display());
            Ok((f, primary.to_path_buf(), false))
        }
        Err(primary_err) => {
            warn!(
                "primary source {} unreadable ({}), trying fallback {}",
                primary.display(),
                primary_err,
                fallback.display()
            );
            match File::open(fallback) {
                Ok(f) => Ok((f, fallback.to_path_buf(), true)),
                Err(fallback_err) => Err(ReportError::Ingest {
                    primary: primary.to_path_buf(),
                    primary_cause: primary_err.to_string(),
                    fallback: fallback.to_path_buf(),
                    fallback_cause: fallback_err.to_string(),
                }),
            }
        }
    }
}

/// Read the whole ledger into memory: header row first, then every body row
/// as raw text. Unreadable records are counted and skipped.
pub fn load_raw(primary: &Path, fallback: &Path) -> Result<RawTable, ReportError> {
    let (file, source, fallback_used) = resolve_source(primary, fallback)?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = rdr
        .headers()
        .map_err(|e| ReportError::Read { path: source.clone(), source: e })?
        .clone();

    let mut rows: Vec<StringRecord> = Vec::new();
    let mut rows_unreadable = 0usize;
    for result in rdr.records() {
        match result {
            Ok(rec) => rows.push(rec),
            Err(_) => rows_unreadable += 1,
        }
    }

    let schema = infer_schema(&headers, &rows);
    for (name, ty) in &schema {
        debug!("inferred column {} as {:?}", name, ty);
    }
    info!(
        "loaded {} rows from {} ({} unreadable)",
        rows.len(),
        source.display(),
        rows_unreadable
    );

    Ok(RawTable {
        headers,
        rows,
        schema,
        source,
        fallback_used,
        rows_unreadable,
    })
}

fn classify(value: &str) -> ColumnType {
    if parse_i64_safe(Some(value)).is_some() {
        ColumnType::Integer
    } else if parse_f64_safe(Some(value)).is_some() {
        ColumnType::Float
    } else if parse_invoice_date(Some(value)).is_some() {
        ColumnType::Date
    } else {
        ColumnType::Text
    }
}

fn widen(a: ColumnType, b: ColumnType) -> ColumnType {
    use ColumnType::*;
    match (a, b) {
        (x, y) if x == y => x,
        (Integer, Float) | (Float, Integer) => Float,
        _ => Text,
    }
}

/// Infer each column's narrowest type from a full scan of its non-empty
/// values. Columns with no values at all stay Text.
pub fn infer_schema(headers: &StringRecord, rows: &[StringRecord]) -> Vec<(String, ColumnType)> {
    let mut types: Vec<Option<ColumnType>> = vec![None; headers.len()];
    for row in rows {
        for (i, slot) in types.iter_mut().enumerate() {
            let value = row.get(i).unwrap_or("").trim();
            if value.is_empty() {
                continue;
            }
            let ty = classify(value);
            *slot = Some(match *slot {
                Some(prev) => widen(prev, ty),
                None => ty,
            });
        }
    }
    headers
        .iter()
        .zip(types)
        .map(|(name, ty)| (name.to_string(), ty.unwrap_or(ColumnType::Text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn schema_inference_picks_the_narrowest_type() {
        let headers = record(&["Quantity", "UnitPrice", "InvoiceDate", "StockCode", "CustomerID"]);
        let rows = vec![
            record(&["6", "2.55", "12/1/2010 08:26", "85123A", "17850"]),
            record(&["2", "5", "1/2/2011 10:00", "71053", ""]),
        ];
        let schema = infer_schema(&headers, &rows);
        assert_eq!(schema[0].1, ColumnType::Integer);
        // "5" alone is an integer; widened with "2.55" the column is Float.
        assert_eq!(schema[1].1, ColumnType::Float);
        assert_eq!(schema[2].1, ColumnType::Date);
        assert_eq!(schema[3].1, ColumnType::Text);
        // Empty values do not widen; the remaining "17850" keeps it Integer.
        assert_eq!(schema[4].1, ColumnType::Integer);
    }

    #[test]
    fn all_empty_column_stays_text() {
        let headers = record(&["Notes"]);
        let rows = vec![record(&[""]), record(&["  "])];
        let schema = infer_schema(&headers, &rows);
        assert_eq!(schema[0].1, ColumnType::Text);
    }

    #[test]
    fn missing_primary_falls_back() {
        let dir = tempdir().unwrap();
        let fallback = dir.path().join("ledger.csv");
        let mut f = File::create(&fallback).unwrap();
        writeln!(f, "InvoiceDate,StockCode,Quantity,UnitPrice,CustomerID").unwrap();
        writeln!(f, "12/1/2010 08:26,85123A,6,2.55,17850").unwrap();

        let table = load_raw(&dir.path().join("nope.csv"), &fallback).unwrap();
        assert!(table.fallback_used);
        assert_eq!(table.source, fallback);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows_unreadable, 0);
    }

    #[test]
    fn both_sources_unreadable_is_an_ingest_error() {
        let dir = tempdir().unwrap();
        let err = load_raw(&dir.path().join("a.csv"), &dir.path().join("b.csv")).unwrap_err();
        match err {
            ReportError::Ingest { primary, fallback, .. } => {
                assert!(primary.ends_with("a.csv"));
                assert!(fallback.ends_with("b.csv"));
            }
            other => panic!("expected Ingest, got {other:?}"),
        }
    }
}
