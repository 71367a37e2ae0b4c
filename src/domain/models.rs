use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant who manages applications and issues end-user credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    // ---
    pub username: String,
    pub password_hash: String,
    pub owner_id: Uuid,
}

impl Seller {
    // ---
    pub fn new(username: String, password_hash: String) -> Self {
        // ---
        Self {
            username,
            password_hash,
            owner_id: Uuid::new_v4(),
        }
    }
}

/// A seller's product. Client software authenticates against the
/// `(owner_id, app_secret)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    // ---
    pub app_id: Uuid,
    pub app_secret: String,
    pub name: String,
    pub owner_id: Uuid,
    pub webhook: Option<WebhookConfig>,
}

impl Application {
    // ---
    pub fn new(name: String, owner_id: Uuid, app_secret: String) -> Self {
        // ---
        Self {
            app_id: Uuid::new_v4(),
            app_secret,
            name,
            owner_id,
            webhook: None,
        }
    }
}

/// Per-application webhook settings.
///
/// The `show_*` flags gate which fields end up in the delivered payload;
/// `enabled = false` suppresses delivery entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    // ---
    pub url: String,
    pub enabled: bool,
    pub show_hwid: bool,
    pub show_ip: bool,
    pub show_app: bool,
    pub show_expiry: bool,
}

/// A license issued to one end user of an application.
///
/// `hwid` is `None` until the first successful login binds it; once set,
/// the binding is permanent for the life of the credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndUserCredential {
    // ---
    pub id: Uuid,

    /// Application this credential belongs to
    pub app_id: Uuid,

    /// Unique per application, not globally
    pub username: String,

    /// Compared by exact match on client login (see DESIGN.md)
    pub password: String,

    /// Concrete instant, or the lifetime sentinel (year 9999)
    pub expires_at: DateTime<Utc>,

    /// Hardware identifier bound on first successful login
    pub hwid: Option<String>,
}

impl EndUserCredential {
    // ---
    pub fn new(
        app_id: Uuid,
        username: String,
        password: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            app_id,
            username,
            password,
            expires_at,
            hwid: None,
        }
    }
}

/// Snapshot of a successful client login, handed to the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct LoginEvent {
    // ---
    pub app_name: String,
    pub username: String,
    pub hwid: String,
    pub client_ip: String,
    pub expires_at: DateTime<Utc>,
}
