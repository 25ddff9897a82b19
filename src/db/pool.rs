//! Database connection pool
//!
//! Creates the SQLite pool the repositories run on. Foreign keys are
//! enabled on every pool so the cascade rules in the schema actually hold.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Create a connection pool from configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let url = normalize_url(&config.url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", config.url))?;

    // Cascade deletes depend on this pragma
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}

/// Create an in-memory pool for tests.
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(&DatabaseConfig {
        url: ":memory:".to_string(),
        max_connections: 1,
    })
    .await
}

fn normalize_url(url: &str) -> String {
    if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else if url.starts_with("sqlite:") {
        url.to_string()
    } else {
        // Plain file path: create the file on first connect
        format!("sqlite:{url}?mode=rwc")
    }
}
