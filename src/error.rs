use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a report run. Row-level problems are never errors;
/// they are absorbed into per-stage counters and surfaced in the run summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Neither the primary nor the fallback input could be opened.
    #[error(
        "no readable input: primary {primary:?} ({primary_cause}), fallback {fallback:?} ({fallback_cause})"
    )]
    Ingest {
        primary: PathBuf,
        primary_cause: String,
        fallback: PathBuf,
        fallback_cause: String,
    },

    /// The chosen source opened but its header row is unreadable as CSV.
    #[error("unreadable input {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The report destination could not be written or published.
    #[error("failed to write report under {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
