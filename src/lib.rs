//! Batch aggregation engine for a transactional sales ledger.
//!
//! Reads a delimited ledger (one row per invoice line) from the first
//! readable of two candidate sources, cleans and types each row, removes
//! exact duplicates, and aggregates by invoice month: distinct products
//! sold, total quantity, total revenue, distinct purchasing customers, and
//! customers who bought nothing that month. The report is published as a
//! single CSV inside a fresh timestamped directory.

pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod transform;
pub mod types;
pub mod util;

pub use error::ReportError;
pub use pipeline::generate_report;
