// src/lib.rs
use anyhow::{Context, Result};
use app_state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

use handlers::health_check;
use handlers::metrics_handler;
use handlers::root_handler;
use std::env;

// Public exports (visible outside this module)
pub mod domain;
pub mod engine;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_argon2_hasher, // ---
    create_memory_store,
    create_noop_metrics,
    create_postgres_store,
    create_prom_metrics,
    create_webhook_notifier,
    init_database_with_retry,
};

/// Build the HTTP router with store and metrics implementations determined
/// by environment variables.
pub async fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("KEYGATE_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // ✅ Ignores if already initialized

    // Create infrastructure dependencies
    let store = match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            create_memory_store()
        }
        StoreBackend::Postgres => {
            let db_config = config
                .store
                .database
                .as_ref()
                .context("postgres backend requires database configuration")?;
            let pool = init_database_with_retry(db_config).await?;
            create_postgres_store(pool)
        }
    };

    let hasher = create_argon2_hasher();
    let notifier = create_webhook_notifier(config.webhook.timeout)?;

    // Build application state with all dependencies
    let app_state = AppState::new(store, hasher, notifier, metrics);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/register", post(handlers::seller_register))
        .route("/login", post(handlers::seller_login))
        .nest(
            "/sellers",
            Router::new().route("/delete", post(handlers::seller_delete)),
        )
        .nest(
            "/apps",
            Router::new()
                .route("/create", post(handlers::create_app))
                .route("/list", post(handlers::list_apps))
                .route("/webhook", post(handlers::set_webhook))
                .route("/delete", post(handlers::delete_app)),
        )
        .nest(
            "/users",
            Router::new()
                .route("/create", post(handlers::create_user))
                .route("/list", post(handlers::list_users))
                .route("/extend", post(handlers::extend_user))
                .route("/delete", post(handlers::delete_user)),
        )
        .nest(
            "/api/1.0",
            Router::new().route("/user_login", post(handlers::user_login)),
        )
        .with_state(app_state);

    Ok(router)
}
