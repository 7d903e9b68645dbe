use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use cinereview::{AppConfig, ApplicationServer, Logger, SqliteDatabase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards have to live as long as main or buffered logs and sentry events get dropped
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    info!("logger and env prepped, connecting to sqlite...");

    let database = SqliteDatabase::connect(&config.database_url)
        .await
        .context("could not open the database")?;

    if config.run_migrations {
        info!("running migrations...");
        database.migrate().await?;
    }

    info!("database ok, starting server...");

    ApplicationServer::serve(config, database)
        .await
        .context("server failed to start")?;

    Ok(())
}
