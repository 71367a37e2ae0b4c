//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains the
//! store, hasher, notifier, and metrics implementations — every external
//! collaborator the handlers and engine need.
//!
//! The state is designed to be cheaply cloneable (all fields are `Arc`
//! trait objects) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::domain::{HasherPtr, MetricsPtr, NotifierPtr, StorePtr};

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application: handlers depend on the `LicenseStore`, `IdentityHasher`,
/// `Notifier`, and `Metrics` abstractions, never on a concrete backend.
/// It is built once at startup, attached via `.with_state(app_state)`, and
/// cloned automatically by Axum for each incoming request.
#[derive(Clone)]
pub(crate) struct AppState {
    /// License data persistence (Postgres or in-memory).
    store: StorePtr,

    /// Seller password hashing (argon2id).
    hasher: HasherPtr,

    /// Fire-and-forget login-event delivery.
    notifier: NotifierPtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,
}

impl AppState {
    // ---

    pub fn new(
        store: StorePtr,
        hasher: HasherPtr,
        notifier: NotifierPtr,
        metrics: MetricsPtr,
    ) -> Self {
        // ---
        AppState {
            store,
            hasher,
            notifier,
            metrics,
        }
    }

    /// Get a reference to the store implementation.
    pub(crate) fn store(&self) -> &StorePtr {
        // ---
        &self.store
    }

    /// Get a reference to the password hasher.
    pub(crate) fn hasher(&self) -> &HasherPtr {
        // ---
        &self.hasher
    }

    /// Get a reference to the notifier implementation.
    pub(crate) fn notifier(&self) -> &NotifierPtr {
        // ---
        &self.notifier
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }
}
