mod database;
mod hasher;
pub mod metrics;
mod notify;

// Re-export the factory functions for easy access
pub use database::{
    create_memory_store, create_postgres_store, init_database_with_retry, MemoryStore,
    PostgresStore,
};
pub use hasher::create_argon2_hasher;
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use notify::create_webhook_notifier;
