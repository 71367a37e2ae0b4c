//! In-memory `LicenseStore` backend.
//!
//! Used for development and tests. Every operation takes the single mutex
//! exactly once, which gives the same atomicity the Postgres backend gets
//! from unique constraints and conditional updates.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::{
    Application, EndUserCredential, LicenseStore, Seller, StoreError, WebhookConfig,
};

#[derive(Default)]
struct Tables {
    // ---
    /// Keyed by username (the primary key in the relational schema).
    sellers: HashMap<String, Seller>,
    applications: HashMap<Uuid, Application>,
    credentials: HashMap<Uuid, EndUserCredential>,
}

#[derive(Default)]
pub struct MemoryStore {
    // ---
    tables: Mutex<Tables>,
}

impl MemoryStore {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        // ---
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("store mutex poisoned")))
    }
}

#[async_trait::async_trait]
impl LicenseStore for MemoryStore {
    // ---
    async fn create_seller(&self, seller: Seller) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        if tables.sellers.contains_key(&seller.username) {
            return Err(StoreError::Conflict);
        }
        tables.sellers.insert(seller.username.clone(), seller);
        Ok(())
    }

    async fn get_seller_by_username(&self, username: &str) -> Result<Option<Seller>, StoreError> {
        // ---
        Ok(self.lock()?.sellers.get(username).cloned())
    }

    async fn delete_seller(&self, owner_id: Uuid) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        let Some(username) = tables
            .sellers
            .values()
            .find(|s| s.owner_id == owner_id)
            .map(|s| s.username.clone())
        else {
            return Err(StoreError::NotFound);
        };

        tables.sellers.remove(&username);

        // Cascade under the same lock hold.
        let app_ids: Vec<Uuid> = tables
            .applications
            .values()
            .filter(|a| a.owner_id == owner_id)
            .map(|a| a.app_id)
            .collect();
        for app_id in &app_ids {
            tables.applications.remove(app_id);
        }
        tables.credentials.retain(|_, c| !app_ids.contains(&c.app_id));

        Ok(())
    }

    async fn create_application(&self, app: Application) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        if tables
            .applications
            .values()
            .any(|a| a.app_secret == app.app_secret)
        {
            return Err(StoreError::Conflict);
        }
        tables.applications.insert(app.app_id, app);
        Ok(())
    }

    async fn list_applications(&self, owner_id: Uuid) -> Result<Vec<Application>, StoreError> {
        // ---
        Ok(self
            .lock()?
            .applications
            .values()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_application_by_secret(
        &self,
        owner_id: Uuid,
        app_secret: &str,
    ) -> Result<Option<Application>, StoreError> {
        // ---
        Ok(self
            .lock()?
            .applications
            .values()
            .find(|a| a.owner_id == owner_id && a.app_secret == app_secret)
            .cloned())
    }

    async fn set_webhook_config(
        &self,
        app_id: Uuid,
        config: WebhookConfig,
    ) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        match tables.applications.get_mut(&app_id) {
            Some(app) => {
                app.webhook = Some(config);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_application(&self, app_id: Uuid) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        if tables.applications.remove(&app_id).is_none() {
            return Err(StoreError::NotFound);
        }
        tables.credentials.retain(|_, c| c.app_id != app_id);
        Ok(())
    }

    async fn insert_credential(&self, credential: EndUserCredential) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        let duplicate = tables
            .credentials
            .values()
            .any(|c| c.app_id == credential.app_id && c.username == credential.username);
        if duplicate {
            return Err(StoreError::Conflict);
        }
        tables.credentials.insert(credential.id, credential);
        Ok(())
    }

    async fn get_credential(
        &self,
        app_id: Uuid,
        username: &str,
    ) -> Result<Option<EndUserCredential>, StoreError> {
        // ---
        Ok(self
            .lock()?
            .credentials
            .values()
            .find(|c| c.app_id == app_id && c.username == username)
            .cloned())
    }

    async fn get_credential_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EndUserCredential>, StoreError> {
        // ---
        Ok(self.lock()?.credentials.get(&id).cloned())
    }

    async fn list_credentials(&self, app_id: Uuid) -> Result<Vec<EndUserCredential>, StoreError> {
        // ---
        Ok(self
            .lock()?
            .credentials
            .values()
            .filter(|c| c.app_id == app_id)
            .cloned()
            .collect())
    }

    async fn try_bind_hwid(&self, id: Uuid, hwid: &str) -> Result<bool, StoreError> {
        // ---
        // Mirrors the SQL backend: a missing credential reports `false`
        // rather than an error, and the caller re-reads to find out why.
        let mut tables = self.lock()?;

        Ok(match tables.credentials.get_mut(&id) {
            Some(c) if c.hwid.is_none() => {
                c.hwid = Some(hwid.to_string());
                true
            }
            _ => false,
        })
    }

    async fn update_expiry(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        // ---
        let mut tables = self.lock()?;

        match tables.credentials.get_mut(&id) {
            Some(c) => {
                c.expires_at = expires_at;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError> {
        // ---
        match self.lock()?.credentials.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}
