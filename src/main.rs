use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;
use vlr_loader::load::{self, StatWindow};
use vlr_loader::util::env as env_util;
use vlr_loader::{Db, LoadError, LoadReport};

#[derive(Parser, Debug)]
#[command(
    name = "vlr-loader",
    version,
    about = "Load Valorant esports CSV exports into Postgres"
)]
struct Cli {
    /// Optional override for the database URL
    #[arg(long)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Load match results and per-match team stat lines
    Matches {
        /// Dataset file (defaults to content/aggregated_game_stats.csv)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Load per-player-per-agent aggregate stats
    Players {
        /// Dataset file (defaults to content/player_stats[_90days].csv)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Which aggregate table to target
        #[arg(long, value_enum, default_value = "all-time")]
        window: WindowArg,
    },
    /// Load current roster membership
    Rosters {
        /// Dataset file (defaults to content/overall_game_stats.csv)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Load team-region assignments
    TeamRegions {
        /// Dataset file (defaults to content/team_regions.csv)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run every dataset job serially against a content directory
    All {
        #[arg(long, default_value = "content")]
        dir: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WindowArg {
    AllTime,
    Last90Days,
}

impl From<WindowArg> for StatWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::AllTime => StatWindow::AllTime,
            WindowArg::Last90Days => StatWindow::Last90Days,
        }
    }
}

fn default_path(file: Option<PathBuf>, name: &str) -> PathBuf {
    file.unwrap_or_else(|| PathBuf::from("content").join(name))
}

/// Log the outcome and propagate failure so the process exits non-zero; an
/// orchestrating refresh must be able to tell a faulted run from a clean one.
fn finish(result: Result<LoadReport, LoadError>) -> Result<()> {
    match result {
        Ok(report) => {
            report.log();
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "load job failed; transaction rolled back");
            Err(err.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let db_url = match cli.db_url {
        Some(url) => url,
        None => env_util::db_url().context(
            "database URL must be configured (DATABASE_URL or DB_HOST/DB_NAME/DB_USER/DB_PASSWORD)",
        )?,
    };
    let db = Db::connect(&db_url, 5).await?;

    match cli.command {
        Commands::Matches { file } => {
            let file = default_path(file, load::matches::DEFAULT_FILE);
            finish(load::matches::run(&db, &file).await)?;
        }
        Commands::Players { file, window } => {
            let window = StatWindow::from(window);
            let file = default_path(file, window.default_file());
            finish(load::player_stats::run(&db, &file, window).await)?;
        }
        Commands::Rosters { file } => {
            let file = default_path(file, load::rosters::DEFAULT_FILE);
            finish(load::rosters::run(&db, &file).await)?;
        }
        Commands::TeamRegions { file } => {
            let file = default_path(file, load::team_regions::DEFAULT_FILE);
            finish(load::team_regions::run(&db, &file).await)?;
        }
        Commands::All { dir } => {
            // Serial, fail-fast: one job fully committed or rolled back
            // before the next starts.
            finish(load::matches::run(&db, &dir.join(load::matches::DEFAULT_FILE)).await)?;
            for window in [StatWindow::AllTime, StatWindow::Last90Days] {
                finish(
                    load::player_stats::run(&db, &dir.join(window.default_file()), window).await,
                )?;
            }
            finish(load::rosters::run(&db, &dir.join(load::rosters::DEFAULT_FILE)).await)?;
            finish(
                load::team_regions::run(&db, &dir.join(load::team_regions::DEFAULT_FILE)).await,
            )?;
        }
    }

    Ok(())
}
