//! Per-player-per-agent aggregate stats. Two identically shaped tables exist,
//! one all-time and one trailing-90-day; the window only selects the target
//! table and the source file, the load logic is shared.

use std::path::Path;

use super::{input_error, open_csv, ConflictPolicy, FactTable, LoadReport};
use crate::db::Db;
use crate::error::LoadError;
use crate::parse;
use crate::records::PlayerAgentRow;
use crate::resolve::EntityResolver;

/// Which aggregate window a player-stats job targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatWindow {
    AllTime,
    Last90Days,
}

impl StatWindow {
    pub fn table(self) -> &'static str {
        match self {
            StatWindow::AllTime => "PlayerAgentStats",
            StatWindow::Last90Days => "PlayerAgentStats_90Days",
        }
    }

    pub fn dataset(self) -> &'static str {
        match self {
            StatWindow::AllTime => "player-stats",
            StatWindow::Last90Days => "player-stats-90days",
        }
    }

    pub fn default_file(self) -> &'static str {
        match self {
            StatWindow::AllTime => "player_stats.csv",
            StatWindow::Last90Days => "player_stats_90days.csv",
        }
    }

    pub fn fact_table(self) -> FactTable {
        FactTable {
            name: self.table(),
            key: &["player_id", "agent_id"],
            policy: ConflictPolicy::Ignore,
        }
    }
}

/// Load one player-aggregate dataset into the window's table.
pub async fn run(db: &Db, path: &Path, window: StatWindow) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::new(window.dataset());
    let mut reader = open_csv(path)?;
    let resolver = EntityResolver::new();

    let insert_sql = format!(
        "INSERT INTO {} (player_id, agent_id, rounds, r2, use_pct, acs, kd_ratio, adr, \
         kast_pct, kpr, fkpr, fdpr, kills, deaths, assists, fk, fd) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) {}",
        window.table(),
        window.fact_table().on_conflict()
    );

    let mut tx = db.pool.begin().await?;
    for (idx, record) in reader.deserialize::<PlayerAgentRow>().enumerate() {
        let row = record.map_err(|source| input_error(path, source))?;
        report.rows_read += 1;

        let player_id = resolver.player(&mut tx, &row.player).await?;
        let agent_id = resolver.agent(&mut tx, &row.agent).await?;

        let use_pct = report.tolerate(parse::labeled_percentage(&row.use_raw, idx, "Use"));
        let kast_pct = report.tolerate(parse::percentage(&row.kast_raw, idx, "KAST"));

        let result = sqlx::query(&insert_sql)
            .persistent(false)
            .bind(player_id)
            .bind(agent_id)
            .bind(row.rounds)
            .bind(row.r2)
            .bind(use_pct)
            .bind(row.acs)
            .bind(row.kd_ratio)
            .bind(row.adr)
            .bind(kast_pct)
            .bind(row.kpr)
            .bind(row.fkpr)
            .bind(row.fdpr)
            .bind(row.kills)
            .bind(row.deaths)
            .bind(row.assists)
            .bind(row.fk)
            .bind(row.fd)
            .execute(&mut *tx)
            .await?;
        report.rows_written += result.rows_affected();
    }
    tx.commit().await?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_target_distinct_tables_with_identical_keys() {
        let all = StatWindow::AllTime.fact_table();
        let recent = StatWindow::Last90Days.fact_table();
        assert_eq!(all.name, "PlayerAgentStats");
        assert_eq!(recent.name, "PlayerAgentStats_90Days");
        assert_eq!(all.key, recent.key);
        assert_eq!(all.on_conflict(), recent.on_conflict());
    }
}
