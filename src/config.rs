// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
///
/// This macro is intended for config unit tests only and enforces
/// consistent error messages across failure cases.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: store::StoreConfig,
    pub webhook: webhook::WebhookClientConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            store: store::StoreConfig::from_env()?,
            webhook: webhook::WebhookClientConfig::from_env()?,
        })
    }
}

// ============================================================
// Store configuration
// ============================================================

mod store {
    // ---
    use super::*;

    /// Which `LicenseStore` backend to run against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreBackend {
        Postgres,
        Memory,
    }

    /// Store selection plus, for Postgres, its connection settings.
    ///
    /// `KEYGATE_STORE_TYPE=memory` swaps in the in-memory backend and makes
    /// `DATABASE_URL` optional — handy for development and hermetic tests.
    #[derive(Debug, Clone)]
    pub struct StoreConfig {
        pub backend: StoreBackend,
        pub database: Option<DatabaseConfig>,
    }

    impl StoreConfig {
        /// Builds a [`StoreConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if the Postgres backend is selected and its
        /// required configuration is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend = match std::env::var("KEYGATE_STORE_TYPE").as_deref() {
                Ok("memory") => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            };

            let database = match backend {
                StoreBackend::Postgres => Some(DatabaseConfig::from_env()?),
                StoreBackend::Memory => None,
            };

            Ok(Self { backend, database })
        }
    }

    /// Database-related configuration derived from environment variables.
    ///
    /// Required whenever the Postgres backend is selected and validated
    /// eagerly during startup.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of retry attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        /// Startup will fail fast rather than continuing with incomplete
        /// or invalid configuration.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("KEYGATE_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs =
                optional_env_parse!("KEYGATE_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("KEYGATE_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("KEYGATE_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use store::{DatabaseConfig, StoreBackend, StoreConfig};

// ============================================================
// Webhook client configuration
// ============================================================

mod webhook {
    // ---
    use super::*;

    /// Settings for the outbound webhook HTTP client.
    ///
    /// Webhook delivery is best-effort; the timeout bounds how long a
    /// detached delivery task can hold a connection.
    #[derive(Debug, Clone)]
    pub struct WebhookClientConfig {
        /// Per-delivery request timeout.
        pub timeout: Duration,
    }

    impl WebhookClientConfig {
        /// Builds a [`WebhookClientConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let timeout_secs = optional_env_parse!("KEYGATE_WEBHOOK_TIMEOUT_SEC", u64, 5);

            Ok(Self {
                timeout: Duration::from_secs(timeout_secs),
            })
        }
    }
}
pub use webhook::WebhookClientConfig;

// ============================================================
// Tests
// ============================================================
