use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pub pool: SqlitePool,
}

impl SqliteDatabase {
    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .context("Failed to parse sqlite connection string")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // sqlite creates the file but not the folder it sits in
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to sqlite database")?;

        info!("Sqlite connection established");

        Ok(Self { pool })
    }

    /// single connection that never gets recycled, an in memory database dies with its
    /// connection so tests would lose their tables otherwise
    pub async fn connect_in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to parse sqlite connection string")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in memory sqlite database")?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        info!("Database migrations applied");
        Ok(())
    }

    /// runs a trivial query and reports how long the round trip took in milliseconds
    pub async fn health_check(&self) -> anyhow::Result<f64> {
        let start = Instant::now();

        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database health check failed")?;

        Ok(start.elapsed().as_secs_f64() * 1000.0)
    }
}
