//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).

use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env if present, exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Get required env var; error if missing.
pub fn env_req(key: &str) -> anyhow::Result<String> {
    init_env();
    std::env::var(key).map_err(|_| anyhow::anyhow!("missing env var {key}"))
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the database DSN. `DATABASE_URL` wins when set; otherwise one is
/// composed from the discrete `DB_HOST` / `DB_NAME` / `DB_USER` /
/// `DB_PASSWORD` variables (`DB_PORT` defaults to 5432).
pub fn db_url() -> anyhow::Result<String> {
    if let Some(url) = env_opt("DATABASE_URL") {
        return Ok(url);
    }
    let host = env_req("DB_HOST")?;
    let name = env_req("DB_NAME")?;
    let user = env_req("DB_USER")?;
    let password = env_req("DB_PASSWORD")?;
    let port = env_opt("DB_PORT").unwrap_or_else(|| "5432".to_string());
    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}
