//! Application management endpoints: create, list, webhook config, delete.

use crate::app_state::AppState;
use crate::domain::{Application, AuthError, StoreError, WebhookConfig};
use crate::handlers::shared_types::StatusResponse;
use axum::{extract::State, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AppCreateRequest {
    // ---
    pub owner_id: Uuid,
    pub app_name: String,
}

#[derive(Debug, Serialize)]
pub struct AppCreateResponse {
    // ---
    pub status: &'static str,
    pub app_id: Uuid,
    pub app_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct AppListRequest {
    // ---
    pub owner_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AppSummary {
    // ---
    pub name: String,
    pub app_id: Uuid,
    pub app_secret: String,
}

#[derive(Debug, Serialize)]
pub struct AppListResponse {
    // ---
    pub status: &'static str,
    pub apps: Vec<AppSummary>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookConfigRequest {
    // ---
    pub app_id: Uuid,
    pub url: String,
    pub enabled: bool,
    #[serde(default)]
    pub show_hwid: bool,
    #[serde(default)]
    pub show_ip: bool,
    #[serde(default)]
    pub show_app: bool,
    #[serde(default)]
    pub show_expiry: bool,
}

#[derive(Debug, Deserialize)]
pub struct AppDeleteRequest {
    // ---
    pub app_id: Uuid,
}

/// Equivalent of `secrets.token_hex(16)`: 16 random bytes, hex-encoded.
fn generate_app_secret() -> String {
    // ---
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /apps/create
///
/// Creates an application for a seller and returns the generated
/// `(app_id, app_secret)` pair. The secret is shown exactly once here and
/// in `/apps/list`; clients embed it to call `/api/1.0/user_login`.
#[tracing::instrument(skip(state, req))]
pub async fn create_app(
    State(state): State<AppState>,
    Json(req): Json<AppCreateRequest>,
) -> Result<Json<AppCreateResponse>, AuthError> {
    // ---
    let name = req.app_name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("app_name must be non-empty".to_string()));
    }

    let app = Application::new(name.to_string(), req.owner_id, generate_app_secret());

    state.store().create_application(app.clone()).await?;
    tracing::info!("application created: {} ({})", app.name, app.app_id);

    Ok(Json(AppCreateResponse {
        status: "success",
        app_id: app.app_id,
        app_secret: app.app_secret,
    }))
}

/// POST /apps/list
#[tracing::instrument(skip(state, req))]
pub async fn list_apps(
    State(state): State<AppState>,
    Json(req): Json<AppListRequest>,
) -> Result<Json<AppListResponse>, AuthError> {
    // ---
    let apps = state
        .store()
        .list_applications(req.owner_id)
        .await?
        .into_iter()
        .map(|app| AppSummary {
            name: app.name,
            app_id: app.app_id,
            app_secret: app.app_secret,
        })
        .collect();

    Ok(Json(AppListResponse {
        status: "success",
        apps,
    }))
}

/// POST /apps/webhook
///
/// Sets or replaces an application's login webhook configuration.
#[tracing::instrument(skip(state, req))]
pub async fn set_webhook(
    State(state): State<AppState>,
    Json(req): Json<WebhookConfigRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    // ---
    let url = req.url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AuthError::Validation(
            "url must be an http(s) endpoint".to_string(),
        ));
    }

    let config = WebhookConfig {
        url: url.to_string(),
        enabled: req.enabled,
        show_hwid: req.show_hwid,
        show_ip: req.show_ip,
        show_app: req.show_app,
        show_expiry: req.show_expiry,
    };

    match state.store().set_webhook_config(req.app_id, config).await {
        Ok(()) => Ok(Json(StatusResponse::success())),
        Err(StoreError::NotFound) => Err(AuthError::NotFound),
        Err(err) => Err(err.into()),
    }
}

/// POST /apps/delete
///
/// Deletes an application and every credential issued under it.
#[tracing::instrument(skip(state, req))]
pub async fn delete_app(
    State(state): State<AppState>,
    Json(req): Json<AppDeleteRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    // ---
    match state.store().delete_application(req.app_id).await {
        Ok(()) => {
            tracing::info!("application deleted: {}", req.app_id);
            Ok(Json(StatusResponse::success()))
        }
        Err(StoreError::NotFound) => Err(AuthError::NotFound),
        Err(err) => Err(err.into()),
    }
}
