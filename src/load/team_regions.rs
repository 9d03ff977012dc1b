//! Team-region assignments (`content/team_regions.csv`).
//!
//! This is the one loader allowed to mutate an existing entity row: a
//! replay with a changed region overwrites `Teams.region_id`. Rows missing
//! either column, or repeating the literal header token, are skipped.

use std::path::Path;

use tracing::debug;

use super::{input_error, open_csv, ConflictPolicy, FactTable, LoadReport};
use crate::db::Db;
use crate::error::LoadError;
use crate::records::TeamRegionRow;
use crate::resolve::EntityResolver;

pub const DEFAULT_FILE: &str = "team_regions.csv";

pub const TEAM_REGIONS: FactTable = FactTable {
    name: "Teams",
    key: &["team_name"],
    policy: ConflictPolicy::Update(&["region_id"]),
};

/// Load team-region assignments, upserting the region onto each team.
pub async fn run(db: &Db, path: &Path) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::new("team-regions");
    let mut reader = open_csv(path)?;
    let resolver = EntityResolver::new();

    let upsert_sql = format!(
        "INSERT INTO Teams (team_name, region_id) VALUES ($1, $2) {}",
        TEAM_REGIONS.on_conflict()
    );

    let mut tx = db.pool.begin().await?;
    for (idx, record) in reader.deserialize::<TeamRegionRow>().enumerate() {
        let row = record.map_err(|source| input_error(path, source))?;
        report.rows_read += 1;

        let (region, team) = match (row.region_token(), row.team_name()) {
            (Some(region), Some(team)) => (region, team),
            _ => {
                debug!(row = idx, "skipping invalid team-region row");
                report.rows_skipped += 1;
                continue;
            }
        };

        let region_id = resolver.region(&mut tx, region).await?;
        let team_name = resolver.canonical_team(team);

        let result = sqlx::query(&upsert_sql)
            .persistent(false)
            .bind(team_name)
            .bind(region_id)
            .execute(&mut *tx)
            .await?;
        report.rows_written += result.rows_affected();
    }
    tx.commit().await?;

    Ok(report)
}
