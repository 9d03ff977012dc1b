//! One load job per dataset, each all-or-nothing per batch.
//!
//! Every `run` opens one transaction spanning the whole file, processes rows
//! strictly sequentially, and commits once at the end. Any fatal error
//! unwinds via `?`, dropping the transaction and rolling back the batch.
//! Per-field parse failures are tolerated (NULL + warning) and never abort a
//! row; see [`LoadReport::tolerate`].

pub mod matches;
pub mod player_stats;
pub mod rosters;
pub mod team_regions;

pub use player_stats::StatWindow;

use std::fs::File;
use std::path::Path;

use tracing::{info, warn};

use crate::error::LoadError;
use crate::parse::Unparseable;

/// How a fact table handles a duplicate natural key. Declared per table and
/// rendered into the insert statement itself, so the policy is applied
/// atomically with the insert attempt rather than as a separate existence
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Duplicates are dropped silently; replaying a load is a no-op.
    Ignore,
    /// Duplicates overwrite the listed columns with the incoming values.
    Update(&'static [&'static str]),
}

/// A fact table, its natural key, and the conflict policy declared on it.
#[derive(Debug, Clone, Copy)]
pub struct FactTable {
    pub name: &'static str,
    pub key: &'static [&'static str],
    pub policy: ConflictPolicy,
}

impl FactTable {
    /// The `ON CONFLICT` clause appended to this table's insert statement.
    pub fn on_conflict(&self) -> String {
        let key = self.key.join(", ");
        match self.policy {
            ConflictPolicy::Ignore => format!("ON CONFLICT ({key}) DO NOTHING"),
            ConflictPolicy::Update(columns) => {
                let assignments = columns
                    .iter()
                    .map(|col| format!("{col} = EXCLUDED.{col}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("ON CONFLICT ({key}) DO UPDATE SET {assignments}")
            }
        }
    }
}

/// A recoverable per-field anomaly recorded during a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    pub row: usize,
    pub field: &'static str,
    pub raw: String,
}

impl From<Unparseable> for FieldWarning {
    fn from(u: Unparseable) -> Self {
        Self {
            row: u.row,
            field: u.field,
            raw: u.raw,
        }
    }
}

/// Outcome of one committed load job.
///
/// `rows_written` counts rows the store actually accepted, so an idempotent
/// replay of an ignore-on-conflict dataset reports zero.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: &'static str,
    pub rows_read: u64,
    pub rows_written: u64,
    pub rows_skipped: u64,
    pub warnings: Vec<FieldWarning>,
}

impl LoadReport {
    pub fn new(dataset: &'static str) -> Self {
        Self {
            dataset,
            rows_read: 0,
            rows_written: 0,
            rows_skipped: 0,
            warnings: Vec::new(),
        }
    }

    /// Apply the null-on-failure policy to an optional numeric field: a
    /// parse failure is logged and recorded, and the field becomes NULL
    /// while the row keeps going.
    pub fn tolerate(&mut self, parsed: Result<i32, Unparseable>) -> Option<i32> {
        match parsed {
            Ok(value) => Some(value),
            Err(unparseable) => {
                warn!(
                    dataset = self.dataset,
                    row = unparseable.row,
                    field = unparseable.field,
                    raw = %unparseable.raw,
                    "unparseable field stored as NULL"
                );
                self.warnings.push(FieldWarning::from(unparseable));
                None
            }
        }
    }

    pub fn log(&self) {
        info!(
            dataset = self.dataset,
            rows_read = self.rows_read,
            rows_written = self.rows_written,
            rows_skipped = self.rows_skipped,
            warnings = self.warnings.len(),
            "load committed"
        );
    }
}

/// Open a dataset file, mapping failure to the job-fatal input error.
pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    csv::Reader::from_path(path).map_err(|source| LoadError::Input {
        path: path.to_path_buf(),
        source,
    })
}

/// Attach the file path to a per-record deserialization failure.
pub(crate) fn input_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Input {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::parse;

    #[test]
    fn ignore_policy_renders_do_nothing() {
        let table = FactTable {
            name: "Matches",
            key: &["match_id"],
            policy: ConflictPolicy::Ignore,
        };
        assert_eq!(table.on_conflict(), "ON CONFLICT (match_id) DO NOTHING");
    }

    #[test]
    fn ignore_policy_renders_composite_keys() {
        let table = FactTable {
            name: "MatchStats",
            key: &["match_id", "team_id"],
            policy: ConflictPolicy::Ignore,
        };
        assert_eq!(
            table.on_conflict(),
            "ON CONFLICT (match_id, team_id) DO NOTHING"
        );
    }

    #[test]
    fn update_policy_renders_excluded_assignments() {
        let table = FactTable {
            name: "Teams",
            key: &["team_name"],
            policy: ConflictPolicy::Update(&["region_id"]),
        };
        assert_eq!(
            table.on_conflict(),
            "ON CONFLICT (team_name) DO UPDATE SET region_id = EXCLUDED.region_id"
        );
    }

    #[test]
    fn tolerate_records_warning_and_returns_null() {
        let mut report = LoadReport::new("player-stats");
        let value = report.tolerate(parse::labeled_percentage("garbage", 3, "Use"));
        assert_eq!(value, None);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "Use");
        assert_eq!(report.warnings[0].raw, "garbage");

        let value = report.tolerate(parse::percentage("72%", 4, "KAST"));
        assert_eq!(value, Some(72));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn open_csv_surfaces_missing_file_as_input_error() {
        let err = open_csv(Path::new("/nonexistent/content/matches.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Input { .. }));
    }

    #[test]
    fn open_csv_reads_records_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Player,Team,date").unwrap();
        writeln!(file, "Boaster,Fnatic,2024-06-01").unwrap();

        let mut reader = open_csv(file.path()).unwrap();
        let rows: Vec<crate::records::RosterRow> =
            reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team, "Fnatic");
    }
}
