mod error;
mod hasher;
mod metrics;
mod models;
mod notifier;
mod store;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the persistence and identity abstractions
pub use hasher::{HasherPtr, IdentityHasher};
pub use notifier::{Notifier, NotifierPtr};
pub use store::{LicenseStore, StoreError, StorePtr};

// Domain data model and error taxonomy
pub use error::AuthError;
pub use models::{Application, EndUserCredential, LoginEvent, Seller, WebhookConfig};
