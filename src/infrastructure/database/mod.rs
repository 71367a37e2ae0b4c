mod memory_store;
mod postgres_store;


pub use memory_store::MemoryStore;
pub use postgres_store::PostgresStore;

use crate::config::DatabaseConfig;
use crate::domain::StorePtr;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Schema bootstrap. `IF NOT EXISTS` keeps startup idempotent when several
/// replicas race to create the same tables.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sellers (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        owner_id UUID NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS applications (
        app_id UUID PRIMARY KEY,
        app_secret TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        owner_id UUID NOT NULL REFERENCES sellers (owner_id) ON DELETE CASCADE,
        webhook_url TEXT,
        webhook_enabled BOOLEAN NOT NULL DEFAULT FALSE,
        webhook_show_hwid BOOLEAN NOT NULL DEFAULT FALSE,
        webhook_show_ip BOOLEAN NOT NULL DEFAULT FALSE,
        webhook_show_app BOOLEAN NOT NULL DEFAULT FALSE,
        webhook_show_expiry BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "CREATE TABLE IF NOT EXISTS end_users (
        id UUID PRIMARY KEY,
        app_id UUID NOT NULL REFERENCES applications (app_id) ON DELETE CASCADE,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL,
        hwid TEXT,
        UNIQUE (app_id, username)
    )",
];

/// Connect to Postgres with startup retries, then apply the schema.
///
/// Retries cover the common deployment case where the database container
/// comes up after the service.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let mut attempts = 0u32;

    let pool = loop {
        attempts += 1;

        let result = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => break pool,
            Err(err) if attempts < config.retry_count => {
                tracing::warn!("database connect attempt {attempts} failed: {err}");
                sleep(Duration::from_secs(1)).await;
            }
            Err(err) => {
                return Err(err).context("database connection failed after retries");
            }
        }
    };

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .context("schema bootstrap failed")?;
    }

    tracing::info!("database initialized after {attempts} attempt(s)");
    Ok(pool)
}

/// Creates the Postgres-backed store.
pub fn create_postgres_store(pool: PgPool) -> StorePtr {
    // ---
    Arc::new(PostgresStore::new(pool))
}

/// Creates the in-memory store used for development and tests.
pub fn create_memory_store() -> StorePtr {
    // ---
    Arc::new(MemoryStore::new())
}
