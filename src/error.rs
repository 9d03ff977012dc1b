use std::path::PathBuf;

use thiserror::Error;

/// Fatal load-job failures. Any of these unwinds the job, rolls back the
/// open transaction, and is surfaced to the caller as a non-zero exit.
///
/// Recoverable conditions (unparseable optional fields, skippable rows) are
/// handled inside row processing and never show up here; see
/// [`crate::load::LoadReport`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be read, or a row failed structural
    /// deserialization (missing or ill-typed required column).
    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row carried a structurally invalid required value (e.g. a match
    /// date that is not a date).
    #[error("row {row}: {reason}")]
    Row { row: usize, reason: String },

    /// A storage failure not covered by the declared conflict policy:
    /// constraint violation, lost connection, schema mismatch.
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}
