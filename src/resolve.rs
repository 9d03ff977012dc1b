//! Name-to-identifier resolution for the entity tables.
//!
//! Every resolution is a single atomic find-or-create statement against the
//! caller's open transaction. A read-then-insert split would open a window
//! where two callers both observe "absent" and both create the entity; the
//! no-op `DO UPDATE` below makes the insert return the surviving row's id in
//! either outcome, so repeated or concurrent resolution of one name always
//! yields the same identifier.

use sqlx::{PgConnection, Row};

use crate::normalization::TeamAliases;

/// Resolves free-text entity names to surrogate identifiers, creating the
/// entity on first reference.
///
/// Team names are routed through the shared alias table before lookup;
/// player, agent, and region names are used verbatim.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    aliases: TeamAliases,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityResolver {
    pub fn new() -> Self {
        Self {
            aliases: TeamAliases::with_defaults(),
        }
    }

    #[cfg(test)]
    pub fn with_aliases(aliases: TeamAliases) -> Self {
        Self { aliases }
    }

    /// The canonical spelling of a raw team name. Exposed so loaders that
    /// write `Teams` rows directly (team-region upsert) agree with the
    /// loaders that resolve ids.
    pub fn canonical_team<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases.canonical(raw)
    }

    pub async fn team(&self, conn: &mut PgConnection, raw_name: &str) -> sqlx::Result<i32> {
        let name = self.aliases.canonical(raw_name);
        ensure_id(conn, "Teams", "team_name", "team_id", name).await
    }

    pub async fn player(&self, conn: &mut PgConnection, name: &str) -> sqlx::Result<i32> {
        ensure_id(conn, "Players", "player_name", "player_id", name).await
    }

    pub async fn agent(&self, conn: &mut PgConnection, name: &str) -> sqlx::Result<i32> {
        ensure_id(conn, "Agents", "agent_name", "agent_id", name).await
    }

    pub async fn region(&self, conn: &mut PgConnection, name: &str) -> sqlx::Result<i32> {
        ensure_id(conn, "Regions", "region_name", "region_id", name).await
    }
}

/// Atomic find-or-create on a name-unique entity table.
///
/// `ON CONFLICT ... DO NOTHING` would return no row for an existing entity;
/// the self-assignment `DO UPDATE` is the standard trick to make the single
/// statement return the id on both the insert and the conflict path.
async fn ensure_id(
    conn: &mut PgConnection,
    table: &str,
    name_col: &str,
    id_col: &str,
    name: &str,
) -> sqlx::Result<i32> {
    let sql = format!(
        "INSERT INTO {table} ({name_col}) VALUES ($1) \
         ON CONFLICT ({name_col}) DO UPDATE SET {name_col} = EXCLUDED.{name_col} \
         RETURNING {id_col}"
    );
    let row = sqlx::query(&sql)
        .persistent(false)
        .bind(name)
        .fetch_one(conn)
        .await?;
    Ok(row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_resolution_consults_alias_table() {
        let resolver = EntityResolver::new();
        assert_eq!(resolver.canonical_team("Giants Gaming"), "GIANTX");
        assert_eq!(resolver.canonical_team("Sentinels"), "Sentinels");
    }

    #[test]
    fn custom_alias_table_is_honored() {
        let resolver =
            EntityResolver::with_aliases(TeamAliases::default().register("Old Name", "New Name"));
        assert_eq!(resolver.canonical_team("Old Name"), "New Name");
    }
}
