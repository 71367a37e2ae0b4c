use super::models::{Application, EndUserCredential, Seller, WebhookConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Errors surfaced by a store backend.
///
/// `Conflict` and `NotFound` carry the semantics the engine branches on;
/// everything else is an opaque backend failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("record already exists")]
    Conflict,

    /// Update or delete targeted a record that does not exist.
    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Abstraction for license data persistence.
///
/// Uniqueness (`create_seller`, `insert_credential`) and the first-use HWID
/// bind (`try_bind_hwid`) are enforced inside the backend as single atomic
/// operations — callers must never pre-check with a read.
#[async_trait::async_trait]
pub trait LicenseStore: Send + Sync {
    // ---
    /// Create a seller. Fails with `Conflict` if the username is taken.
    async fn create_seller(&self, seller: Seller) -> Result<(), StoreError>;

    /// Get seller by username.
    async fn get_seller_by_username(&self, username: &str) -> Result<Option<Seller>, StoreError>;

    /// Delete a seller and, transitively, its applications and their
    /// credentials. The cascade is atomic from the caller's point of view.
    async fn delete_seller(&self, owner_id: Uuid) -> Result<(), StoreError>;

    /// Create an application bound to an owner.
    async fn create_application(&self, app: Application) -> Result<(), StoreError>;

    /// List all applications owned by a seller.
    async fn list_applications(&self, owner_id: Uuid) -> Result<Vec<Application>, StoreError>;

    /// Resolve an application by its `(owner_id, app_secret)` pair.
    async fn get_application_by_secret(
        &self,
        owner_id: Uuid,
        app_secret: &str,
    ) -> Result<Option<Application>, StoreError>;

    /// Set or replace an application's webhook configuration.
    async fn set_webhook_config(
        &self,
        app_id: Uuid,
        config: WebhookConfig,
    ) -> Result<(), StoreError>;

    /// Delete an application and, transitively, its credentials.
    async fn delete_application(&self, app_id: Uuid) -> Result<(), StoreError>;

    /// Insert a credential. Fails with `Conflict` if `(app_id, username)`
    /// already exists.
    async fn insert_credential(&self, credential: EndUserCredential) -> Result<(), StoreError>;

    /// Get a credential by `(app_id, username)`.
    async fn get_credential(
        &self,
        app_id: Uuid,
        username: &str,
    ) -> Result<Option<EndUserCredential>, StoreError>;

    /// Get a credential by its ID.
    async fn get_credential_by_id(&self, id: Uuid)
        -> Result<Option<EndUserCredential>, StoreError>;

    /// List all credentials issued under an application.
    async fn list_credentials(&self, app_id: Uuid) -> Result<Vec<EndUserCredential>, StoreError>;

    /// Bind `hwid` iff the stored value is still unset.
    ///
    /// Returns `true` when this call performed the bind, `false` when
    /// another writer got there first, the credential is already bound, or
    /// the row no longer exists — callers re-read to tell those apart.
    async fn try_bind_hwid(&self, id: Uuid, hwid: &str) -> Result<bool, StoreError>;

    /// Overwrite a credential's expiry.
    async fn update_expiry(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Delete a credential by its ID.
    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Type alias for any backend that implements LicenseStore.
pub type StorePtr = Arc<dyn LicenseStore>;
