//! Current roster membership, consumed from the wide overall-stats export
//! (`content/overall_game_stats.csv`). One team per player; the first-seen
//! assignment wins and later loads are no-ops.

use std::path::Path;

use super::{input_error, open_csv, ConflictPolicy, FactTable, LoadReport};
use crate::db::Db;
use crate::error::LoadError;
use crate::records::RosterRow;
use crate::resolve::EntityResolver;

pub const DEFAULT_FILE: &str = "overall_game_stats.csv";

pub const ROSTER: FactTable = FactTable {
    name: "Roster",
    key: &["player_id"],
    policy: ConflictPolicy::Ignore,
};

/// Load roster membership rows.
pub async fn run(db: &Db, path: &Path) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::new("rosters");
    let mut reader = open_csv(path)?;
    let resolver = EntityResolver::new();

    let insert_sql = format!(
        "INSERT INTO Roster (player_id, team_id) VALUES ($1, $2) {}",
        ROSTER.on_conflict()
    );

    let mut tx = db.pool.begin().await?;
    for record in reader.deserialize::<RosterRow>() {
        let row = record.map_err(|source| input_error(path, source))?;
        report.rows_read += 1;

        let player_id = resolver.player(&mut tx, &row.player).await?;
        let team_id = resolver.team(&mut tx, &row.team).await?;

        let result = sqlx::query(&insert_sql)
            .persistent(false)
            .bind(player_id)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        report.rows_written += result.rows_affected();
    }
    tx.commit().await?;

    Ok(report)
}
