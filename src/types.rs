use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use tabled::Tabled;

/// Placeholder customer id for ledger lines with a missing or unparseable
/// `CustomerID`. Matches the sentinel the upstream report consumers expect.
pub const ANONYMOUS_CUSTOMER_ID: i64 = 99_999;

/// One ledger line exactly as it appears in the CSV. Every field is optional
/// text; typing happens in the transform stage. Columns beyond these five are
/// passthrough and ignored.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "InvoiceDate")]
    pub invoice_date: Option<String>,
    #[serde(rename = "StockCode")]
    pub stock_code: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Option<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
}

/// A validated, typed ledger line. Construction guarantees
/// `quantity > 0 && unit_price > 0`; the derived fields are always
/// recomputed, never taken from input.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub invoice_date: NaiveDate,
    pub stock_code: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: i64,
    /// `YYYY-MM` group key derived from `invoice_date`.
    pub invoice_month: String,
    /// Always `quantity as f64 * unit_price`.
    pub total_sales: f64,
}

// The float fields are finite and positive by construction (the transform
// filter rejects everything else), so full-field equality is well defined
// and hashing on the bit patterns agrees with it.
impl Eq for CleanRecord {}

impl Hash for CleanRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.invoice_date.hash(state);
        self.stock_code.hash(state);
        self.quantity.hash(state);
        self.unit_price.to_bits().hash(state);
        self.customer_id.hash(state);
        self.invoice_month.hash(state);
        self.total_sales.to_bits().hash(state);
    }
}

/// One output row of the monthly report. Field order here is the column
/// order of the written CSV.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlySummaryRow {
    #[serde(rename = "InvoiceMonthYear")]
    #[tabled(rename = "InvoiceMonthYear")]
    pub invoice_month: String,
    pub total_products_sold: usize,
    pub total_quantity: i64,
    /// Rendered to two decimals so the report is stable across platforms.
    pub total_sales: String,
    pub customers_bought: usize,
    pub customers_who_bought_nothing: usize,
}

/// Per-run diagnostics returned by the pipeline and printed by the CLI.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source: PathBuf,
    pub fallback_used: bool,
    pub rows_read: usize,
    pub rows_unreadable: usize,
    pub rows_dropped_parse: usize,
    pub rows_dropped_filter: usize,
    pub duplicates_removed: usize,
    pub clean_rows: usize,
    /// Rows whose CustomerID was blank or malformed and got the sentinel.
    /// Missing and malformed ids are deliberately indistinguishable here.
    pub anonymous_customer_rows: usize,
    pub months: usize,
    pub output_file: PathBuf,
}
