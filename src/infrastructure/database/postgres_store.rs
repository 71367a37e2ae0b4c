use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Application, EndUserCredential, LicenseStore, Seller, StoreError, WebhookConfig,
};

#[derive(sqlx::FromRow)]
struct SellerRow {
    username: String,
    password_hash: String,
    owner_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    app_id: Uuid,
    app_secret: String,
    name: String,
    owner_id: Uuid,
    webhook_url: Option<String>,
    webhook_enabled: bool,
    webhook_show_hwid: bool,
    webhook_show_ip: bool,
    webhook_show_app: bool,
    webhook_show_expiry: bool,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        // ---
        let webhook = row.webhook_url.map(|url| WebhookConfig {
            url,
            enabled: row.webhook_enabled,
            show_hwid: row.webhook_show_hwid,
            show_ip: row.webhook_show_ip,
            show_app: row.webhook_show_app,
            show_expiry: row.webhook_show_expiry,
        });

        Application {
            app_id: row.app_id,
            app_secret: row.app_secret,
            name: row.name,
            owner_id: row.owner_id,
            webhook,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    app_id: Uuid,
    username: String,
    password: String,
    expires_at: DateTime<Utc>,
    hwid: Option<String>,
}

impl From<CredentialRow> for EndUserCredential {
    fn from(row: CredentialRow) -> Self {
        // ---
        EndUserCredential {
            id: row.id,
            app_id: row.app_id,
            username: row.username,
            password: row.password,
            expires_at: row.expires_at,
            hwid: row.hwid,
        }
    }
}

const APPLICATION_COLUMNS: &str = "app_id, app_secret, name, owner_id, webhook_url, \
     webhook_enabled, webhook_show_hwid, webhook_show_ip, webhook_show_app, webhook_show_expiry";

const CREDENTIAL_COLUMNS: &str = "id, app_id, username, password, expires_at, hwid";

/// SQLSTATE 23505 (unique violation) is the one constraint class callers
/// branch on; everything else is opaque.
fn map_error(err: sqlx::Error) -> StoreError {
    // ---
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Conflict;
        }
    }
    StoreError::Backend(err.into())
}

pub struct PostgresStore {
    // ---
    pool: PgPool,
}

impl PostgresStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LicenseStore for PostgresStore {
    // ---
    async fn create_seller(&self, seller: Seller) -> Result<(), StoreError> {
        // ---
        sqlx::query("INSERT INTO sellers (username, password_hash, owner_id) VALUES ($1, $2, $3)")
            .bind(&seller.username)
            .bind(&seller.password_hash)
            .bind(seller.owner_id)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(())
    }

    async fn get_seller_by_username(&self, username: &str) -> Result<Option<Seller>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, SellerRow>(
            "SELECT username, password_hash, owner_id FROM sellers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(row.map(|r| Seller {
            username: r.username,
            password_hash: r.password_hash,
            owner_id: r.owner_id,
        }))
    }

    async fn delete_seller(&self, owner_id: Uuid) -> Result<(), StoreError> {
        // ---
        // ON DELETE CASCADE removes the seller's applications and their
        // credentials in the same statement.
        let result = sqlx::query("DELETE FROM sellers WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_application(&self, app: Application) -> Result<(), StoreError> {
        // ---
        sqlx::query(
            "INSERT INTO applications (app_id, app_secret, name, owner_id)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(app.app_id)
        .bind(&app.app_secret)
        .bind(&app.name)
        .bind(app.owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(())
    }

    async fn list_applications(&self, owner_id: Uuid) -> Result<Vec<Application>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(rows.into_iter().map(Application::from).collect())
    }

    async fn get_application_by_secret(
        &self,
        owner_id: Uuid,
        app_secret: &str,
    ) -> Result<Option<Application>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE owner_id = $1 AND app_secret = $2"
        ))
        .bind(owner_id)
        .bind(app_secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(row.map(Application::from))
    }

    async fn set_webhook_config(
        &self,
        app_id: Uuid,
        config: WebhookConfig,
    ) -> Result<(), StoreError> {
        // ---
        let result = sqlx::query(
            "UPDATE applications SET webhook_url = $2, webhook_enabled = $3,
                 webhook_show_hwid = $4, webhook_show_ip = $5,
                 webhook_show_app = $6, webhook_show_expiry = $7
             WHERE app_id = $1",
        )
        .bind(app_id)
        .bind(&config.url)
        .bind(config.enabled)
        .bind(config.show_hwid)
        .bind(config.show_ip)
        .bind(config.show_app)
        .bind(config.show_expiry)
        .execute(&self.pool)
        .await
        .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_application(&self, app_id: Uuid) -> Result<(), StoreError> {
        // ---
        let result = sqlx::query("DELETE FROM applications WHERE app_id = $1")
            .bind(app_id)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_credential(&self, credential: EndUserCredential) -> Result<(), StoreError> {
        // ---
        // The UNIQUE (app_id, username) constraint is the source of truth
        // for duplicates, not a prior read.
        sqlx::query(
            "INSERT INTO end_users (id, app_id, username, password, expires_at, hwid)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(credential.id)
        .bind(credential.app_id)
        .bind(&credential.username)
        .bind(&credential.password)
        .bind(credential.expires_at)
        .bind(&credential.hwid)
        .execute(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(())
    }

    async fn get_credential(
        &self,
        app_id: Uuid,
        username: &str,
    ) -> Result<Option<EndUserCredential>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM end_users WHERE app_id = $1 AND username = $2"
        ))
        .bind(app_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(row.map(EndUserCredential::from))
    }

    async fn get_credential_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<EndUserCredential>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM end_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(row.map(EndUserCredential::from))
    }

    async fn list_credentials(&self, app_id: Uuid) -> Result<Vec<EndUserCredential>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM end_users WHERE app_id = $1"
        ))
        .bind(app_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(rows.into_iter().map(EndUserCredential::from).collect())
    }

    async fn try_bind_hwid(&self, id: Uuid, hwid: &str) -> Result<bool, StoreError> {
        // ---
        // `hwid IS NULL` in the predicate makes the bind a compare-and-swap:
        // of any number of concurrent writers, exactly one updates a row.
        let result = sqlx::query("UPDATE end_users SET hwid = $2 WHERE id = $1 AND hwid IS NULL")
            .bind(id)
            .bind(hwid)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_expiry(&self, id: Uuid, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        // ---
        let result = sqlx::query("UPDATE end_users SET expires_at = $2 WHERE id = $1")
            .bind(id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError> {
        // ---
        let result = sqlx::query("DELETE FROM end_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
