//! Typed views of the CSV exports.
//!
//! Column names mirror the source files exactly via `#[serde(rename)]`;
//! columns the loaders do not consume (including the stray pandas
//! `"Unnamed: 0"` index column) are ignored by deserialization.

use serde::{Deserialize, Deserializer};

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    // pandas writes "True"/"False"; other exports use 1/0.
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Ok(true),
        "false" | "f" | "0" | "no" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "not a boolean: {other:?}"
        ))),
    }
}

/// One row of `aggregated_game_stats.csv`: a match result plus both teams'
/// stat lines, suffixed `_T1`/`_T2`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRow {
    #[serde(rename = "Match_ID")]
    pub match_id: String,
    #[serde(rename = "date_str")]
    pub date_str: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "vs Team")]
    pub vs_team: String,
    #[serde(rename = "T1_Won", deserialize_with = "flexible_bool")]
    pub t1_won: bool,

    #[serde(rename = "R2.0_T1")]
    pub r2_t1: f64,
    #[serde(rename = "ACS_T1")]
    pub acs_t1: f64,
    #[serde(rename = "K_T1")]
    pub kills_t1: i32,
    #[serde(rename = "D_T1")]
    pub deaths_t1: i32,
    #[serde(rename = "A_T1")]
    pub assists_t1: i32,
    #[serde(rename = "+/- K/D_T1")]
    pub kd_diff_t1: i32,
    #[serde(rename = "KAST_T1")]
    pub kast_t1: String,
    #[serde(rename = "ADR_T1")]
    pub adr_t1: f64,
    #[serde(rename = "HS%_T1")]
    pub hs_pct_t1: String,
    #[serde(rename = "FK_T1")]
    pub fk_t1: i32,
    #[serde(rename = "FD_T1")]
    pub fd_t1: i32,
    #[serde(rename = "+/- FK/FD_T1")]
    pub fk_fd_diff_t1: i32,

    #[serde(rename = "R2.0_T2")]
    pub r2_t2: f64,
    #[serde(rename = "ACS_T2")]
    pub acs_t2: f64,
    #[serde(rename = "K_T2")]
    pub kills_t2: i32,
    #[serde(rename = "D_T2")]
    pub deaths_t2: i32,
    #[serde(rename = "A_T2")]
    pub assists_t2: i32,
    #[serde(rename = "+/- K/D_T2")]
    pub kd_diff_t2: i32,
    #[serde(rename = "KAST_T2")]
    pub kast_t2: String,
    #[serde(rename = "ADR_T2")]
    pub adr_t2: f64,
    #[serde(rename = "HS%_T2")]
    pub hs_pct_t2: String,
    #[serde(rename = "FK_T2")]
    pub fk_t2: i32,
    #[serde(rename = "FD_T2")]
    pub fd_t2: i32,
    #[serde(rename = "+/- FK/FD_T2")]
    pub fk_fd_diff_t2: i32,
}

/// One team's stat line within a match row.
#[derive(Debug, Clone, Copy)]
pub struct TeamLine<'a> {
    pub r2: f64,
    pub acs: f64,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub kd_diff: i32,
    pub kast: &'a str,
    pub adr: f64,
    pub hs_pct: &'a str,
    pub fk: i32,
    pub fd: i32,
    pub fk_fd_diff: i32,
}

impl MatchRow {
    pub fn team1_line(&self) -> TeamLine<'_> {
        TeamLine {
            r2: self.r2_t1,
            acs: self.acs_t1,
            kills: self.kills_t1,
            deaths: self.deaths_t1,
            assists: self.assists_t1,
            kd_diff: self.kd_diff_t1,
            kast: &self.kast_t1,
            adr: self.adr_t1,
            hs_pct: &self.hs_pct_t1,
            fk: self.fk_t1,
            fd: self.fd_t1,
            fk_fd_diff: self.fk_fd_diff_t1,
        }
    }

    pub fn team2_line(&self) -> TeamLine<'_> {
        TeamLine {
            r2: self.r2_t2,
            acs: self.acs_t2,
            kills: self.kills_t2,
            deaths: self.deaths_t2,
            assists: self.assists_t2,
            kd_diff: self.kd_diff_t2,
            kast: &self.kast_t2,
            adr: self.adr_t2,
            hs_pct: &self.hs_pct_t2,
            fk: self.fk_t2,
            fd: self.fd_t2,
            fk_fd_diff: self.fk_fd_diff_t2,
        }
    }

    /// (winner_id, loser_id) for the resolved team identifiers, per the
    /// row's win flag.
    pub fn winner_loser(&self, team1_id: i32, team2_id: i32) -> (i32, i32) {
        if self.t1_won {
            (team1_id, team2_id)
        } else {
            (team2_id, team1_id)
        }
    }
}

/// One row of `player_stats.csv` / `player_stats_90days.csv`: a player's
/// aggregate line on one agent.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerAgentRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Agent")]
    pub agent: String,
    #[serde(rename = "RND")]
    pub rounds: i32,
    #[serde(rename = "Rating2.0")]
    pub r2: f64,
    /// Compound pick-rate field, `"(matches) NN%"`.
    #[serde(rename = "Use")]
    pub use_raw: String,
    #[serde(rename = "ACS")]
    pub acs: f64,
    #[serde(rename = "K:D")]
    pub kd_ratio: f64,
    #[serde(rename = "ADR")]
    pub adr: f64,
    #[serde(rename = "KAST")]
    pub kast_raw: String,
    #[serde(rename = "KPR")]
    pub kpr: f64,
    #[serde(rename = "FKPR")]
    pub fkpr: f64,
    #[serde(rename = "FDPR")]
    pub fdpr: f64,
    #[serde(rename = "K")]
    pub kills: i32,
    #[serde(rename = "D")]
    pub deaths: i32,
    #[serde(rename = "A")]
    pub assists: i32,
    #[serde(rename = "FK")]
    pub fk: i32,
    #[serde(rename = "FD")]
    pub fd: i32,
}

/// The columns consumed from `overall_game_stats.csv` (a much wider file).
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    // Scrape date; kept for a future joined-at column, not loaded today.
    #[serde(rename = "date")]
    pub date: String,
}

/// One row of `team_regions.csv`. Both columns may be blank or repeat the
/// header token, so validity is decided per row.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRegionRow {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Team Name")]
    pub team: Option<String>,
}

impl TeamRegionRow {
    /// The leading token of the region label (`"EMEA Champions Tour"` →
    /// `"EMEA"`), or `None` when the row must be skipped: empty region or a
    /// repeated literal `Region` header artifact.
    pub fn region_token(&self) -> Option<&str> {
        let region = self.region.as_deref()?.trim();
        if region.is_empty() || region == "Region" {
            return None;
        }
        region.split_whitespace().next()
    }

    /// The team name, or `None` when blank (row must be skipped).
    pub fn team_name(&self) -> Option<&str> {
        let team = self.team.as_deref()?.trim();
        if team.is_empty() {
            None
        } else {
            Some(team)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one<T: for<'de> Deserialize<'de>>(csv_text: &str) -> T {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        reader
            .deserialize()
            .next()
            .expect("one record")
            .expect("deserializes")
    }

    #[test]
    fn match_row_parses_both_team_blocks() {
        let csv_text = "\
Unnamed: 0,Match_ID,date_str,Team,vs Team,T1_Won,R2.0_T1,ACS_T1,K_T1,D_T1,A_T1,+/- K/D_T1,KAST_T1,ADR_T1,HS%_T1,FK_T1,FD_T1,+/- FK/FD_T1,R2.0_T2,ACS_T2,K_T2,D_T2,A_T2,+/- K/D_T2,KAST_T2,ADR_T2,HS%_T2,FK_T2,FD_T2,+/- FK/FD_T2
0,M1,2024-06-09,Giants Gaming,NRG Esports,True,1.12,221.5,68,54,21,+14,74%,148.2,28%,9,5,+4,0.91,198.0,54,68,18,-14,66%,131.7,24%,5,9,-4";
        let row: MatchRow = read_one(csv_text);
        assert_eq!(row.match_id, "M1");
        assert_eq!(row.team, "Giants Gaming");
        assert_eq!(row.vs_team, "NRG Esports");
        assert!(row.t1_won);

        let t1 = row.team1_line();
        assert_eq!(t1.kills, 68);
        assert_eq!(t1.kd_diff, 14); // leading '+' accepted
        assert_eq!(t1.kast, "74%");

        let t2 = row.team2_line();
        assert_eq!(t2.kd_diff, -14);
        assert_eq!(t2.hs_pct, "24%");
    }

    #[test]
    fn winner_loser_follows_win_flag() {
        let csv_text = "\
Match_ID,date_str,Team,vs Team,T1_Won,R2.0_T1,ACS_T1,K_T1,D_T1,A_T1,+/- K/D_T1,KAST_T1,ADR_T1,HS%_T1,FK_T1,FD_T1,+/- FK/FD_T1,R2.0_T2,ACS_T2,K_T2,D_T2,A_T2,+/- K/D_T2,KAST_T2,ADR_T2,HS%_T2,FK_T2,FD_T2,+/- FK/FD_T2
M2,2024-06-10,A,B,False,1,1,1,1,1,0,50%,1,10%,1,1,0,1,1,1,1,1,0,50%,1,10%,1,1,0";
        let row: MatchRow = read_one(csv_text);
        assert_eq!(row.winner_loser(10, 20), (20, 10));
    }

    #[test]
    fn player_agent_row_parses() {
        let csv_text = "\
Player,Agent,RND,Rating2.0,Use,ACS,K:D,ADR,KAST,KPR,FKPR,FDPR,K,D,A,FK,FD
aspas,jett,412,1.21,(152) 35%,248.1,1.31,158.9,73%,0.91,0.21,0.12,375,286,98,87,49";
        let row: PlayerAgentRow = read_one(csv_text);
        assert_eq!(row.player, "aspas");
        assert_eq!(row.agent, "jett");
        assert_eq!(row.rounds, 412);
        assert_eq!(row.use_raw, "(152) 35%");
        assert_eq!(row.kast_raw, "73%");
        assert_eq!(row.fd, 49);
    }

    #[test]
    fn roster_row_ignores_extra_columns() {
        let csv_text = "\
Player,Team,R2.0,ACS,KD,date
Boaster,Fnatic,0.98,190.2,0.95,2024-06-01";
        let row: RosterRow = read_one(csv_text);
        assert_eq!(row.player, "Boaster");
        assert_eq!(row.team, "Fnatic");
        assert_eq!(row.date, "2024-06-01");
    }

    #[test]
    fn team_region_row_keeps_leading_region_token() {
        let csv_text = "Region,Team Name\nEMEA Champions Tour,Fnatic";
        let row: TeamRegionRow = read_one(csv_text);
        assert_eq!(row.region_token(), Some("EMEA"));
        assert_eq!(row.team_name(), Some("Fnatic"));
    }

    #[test]
    fn team_region_row_skips_empty_and_header_artifacts() {
        let csv_text = "Region,Team Name\n,Fnatic\nRegion,Team Name\nEMEA VCT,";
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let rows: Vec<TeamRegionRow> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(rows[0].region_token(), None); // empty region
        assert_eq!(rows[1].region_token(), None); // repeated header token
        assert_eq!(rows[2].region_token(), Some("EMEA"));
        assert_eq!(rows[2].team_name(), None); // empty team
    }
}
