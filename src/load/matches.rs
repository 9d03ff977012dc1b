//! Match results and per-match team stat lines
//! (`content/aggregated_game_stats.csv`).

use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use super::{input_error, open_csv, ConflictPolicy, FactTable, LoadReport};
use crate::db::Db;
use crate::error::LoadError;
use crate::parse;
use crate::records::MatchRow;
use crate::resolve::EntityResolver;

pub const DEFAULT_FILE: &str = "aggregated_game_stats.csv";

pub const MATCHES: FactTable = FactTable {
    name: "Matches",
    key: &["match_id"],
    policy: ConflictPolicy::Ignore,
};

pub const MATCH_STATS: FactTable = FactTable {
    name: "MatchStats",
    key: &["match_id", "team_id"],
    policy: ConflictPolicy::Ignore,
};

/// Load the match dataset: one Matches row plus two MatchStats rows per
/// input row, all within a single transaction.
pub async fn run(db: &Db, path: &Path) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::new("matches");
    let mut reader = open_csv(path)?;
    let resolver = EntityResolver::new();

    let match_sql = format!(
        "INSERT INTO Matches (match_id, date_played, team1_id, team2_id, t1_won) \
         VALUES ($1, $2, $3, $4, $5) {}",
        MATCHES.on_conflict()
    );
    let stats_sql = format!(
        "INSERT INTO MatchStats (match_id, team_id, is_team1, r2, acs, kills, deaths, \
         assists, kd_diff, kast, adr, hs_pct, fk, fd, fk_fd_diff) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) {}",
        MATCH_STATS.on_conflict()
    );

    let mut tx = db.pool.begin().await?;
    for (idx, record) in reader.deserialize::<MatchRow>().enumerate() {
        let row = record.map_err(|source| input_error(path, source))?;
        report.rows_read += 1;

        let date_played = NaiveDate::parse_from_str(row.date_str.trim(), "%Y-%m-%d")
            .map_err(|err| LoadError::Row {
                row: idx,
                reason: format!("bad date {:?}: {err}", row.date_str),
            })?;

        let team1_id = resolver.team(&mut tx, &row.team).await?;
        let team2_id = resolver.team(&mut tx, &row.vs_team).await?;
        let (winner_id, loser_id) = row.winner_loser(team1_id, team2_id);

        let result = sqlx::query(&match_sql)
            .persistent(false)
            .bind(&row.match_id)
            .bind(date_played)
            .bind(winner_id)
            .bind(loser_id)
            .bind(row.t1_won)
            .execute(&mut *tx)
            .await?;
        report.rows_written += result.rows_affected();

        let sides = [
            (team1_id, true, row.team1_line()),
            (team2_id, false, row.team2_line()),
        ];
        for (team_id, is_team1, line) in sides {
            let kast = report.tolerate(parse::percentage(line.kast, idx, "KAST"));
            let hs_pct = report.tolerate(parse::percentage(line.hs_pct, idx, "HS%"));

            let result = sqlx::query(&stats_sql)
                .persistent(false)
                .bind(&row.match_id)
                .bind(team_id)
                .bind(is_team1)
                .bind(line.r2)
                .bind(line.acs)
                .bind(line.kills)
                .bind(line.deaths)
                .bind(line.assists)
                .bind(line.kd_diff)
                .bind(kast)
                .bind(line.adr)
                .bind(hs_pct)
                .bind(line.fk)
                .bind(line.fd)
                .bind(line.fk_fd_diff)
                .execute(&mut *tx)
                .await?;
            report.rows_written += result.rows_affected();
        }

        debug!(match_id = %row.match_id, team1_id, team2_id, "match row processed");
    }
    tx.commit().await?;

    Ok(report)
}
