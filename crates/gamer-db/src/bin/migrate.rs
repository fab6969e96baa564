//! Apply the SQL migrations to the configured database
//!
//! ```bash
//! GAMER__DATABASE__URL=postgres://localhost/gamers cargo run -p gamer-db --bin migrate
//! ```
//!
//! An optional first argument overrides the migrations directory.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use gamer_common::{try_init_tracing, AppConfig, TracingConfig};
use gamer_db::{create_pool, run_migrations, DatabaseConfig, MIGRATIONS_DIR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    try_init_tracing(&TracingConfig::from(&config.telemetry))?;

    let dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(MIGRATIONS_DIR), PathBuf::from);

    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("connecting to database")?;

    info!(dir = %dir.display(), "Running migrations");
    run_migrations(&pool, &dir)
        .await
        .context("applying migrations")?;
    info!("Migrations applied");

    Ok(())
}
