//! End-user credential management endpoints: create, list, extend, delete.

use crate::app_state::AppState;
use crate::domain::{AuthError, StoreError};
use crate::engine;
use crate::handlers::shared_types::StatusResponse;
use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wall-clock format accepted for explicit expiries, interpreted as UTC.
const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UserCreateRequest {
    // ---
    pub app_id: Uuid,
    pub username: String,
    pub password: String,

    /// 0 means a lifetime key.
    pub days: i64,

    /// Optional explicit expiry, `YYYY-MM-DD HH:MM:SS`; wins over `days`.
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserCreateResponse {
    // ---
    pub status: &'static str,
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UserListRequest {
    // ---
    pub app_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    // ---
    pub id: Uuid,
    pub username: String,
    pub expires_at: DateTime<Utc>,
    pub hwid_bound: bool,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    // ---
    pub status: &'static str,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct UserDeleteRequest {
    // ---
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UserExtendRequest {
    // ---
    pub user_id: Uuid,
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct UserExtendResponse {
    // ---
    pub status: &'static str,
    pub new_expiry: DateTime<Utc>,
}

// ============================================================================
// Boundary validation
// ============================================================================

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, AuthError> {
    // ---
    NaiveDateTime::parse_from_str(raw.trim(), EXPIRY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            AuthError::Validation(format!("expires_at must match {EXPIRY_FORMAT}"))
        })
}

fn validated_days(days: i64) -> Result<u32, AuthError> {
    // ---
    u32::try_from(days)
        .map_err(|_| AuthError::Validation("days must be a non-negative integer".to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/create
///
/// Issues a credential under an application. `days = 0` makes it a
/// lifetime key; an explicit `expires_at` overrides `days` entirely.
#[tracing::instrument(skip(state, req))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<UserCreateRequest>,
) -> Result<Json<UserCreateResponse>, AuthError> {
    // ---
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AuthError::Validation(
            "username and password must be non-empty".to_string(),
        ));
    }

    let days = validated_days(req.days)?;
    let explicit = match &req.expires_at {
        Some(raw) => Some(parse_expiry(raw)?),
        None => None,
    };

    let credential = engine::issue_credential(
        state.store(),
        req.app_id,
        username.to_string(),
        req.password.clone(),
        days,
        explicit,
        Utc::now(),
    )
    .await?;

    state.metrics().record_credential_created();
    tracing::info!(
        "credential issued: {} under app {}",
        credential.username,
        credential.app_id
    );

    Ok(Json(UserCreateResponse {
        status: "success",
        id: credential.id,
        expires_at: credential.expires_at,
    }))
}

/// POST /users/list
#[tracing::instrument(skip(state, req))]
pub async fn list_users(
    State(state): State<AppState>,
    Json(req): Json<UserListRequest>,
) -> Result<Json<UserListResponse>, AuthError> {
    // ---
    let users = state
        .store()
        .list_credentials(req.app_id)
        .await?
        .into_iter()
        .map(|c| UserSummary {
            id: c.id,
            username: c.username,
            expires_at: c.expires_at,
            hwid_bound: c.hwid.is_some(),
        })
        .collect();

    Ok(Json(UserListResponse {
        status: "success",
        users,
    }))
}

/// POST /users/extend
///
/// Advances a credential's expiry. Extension stacks on remaining time for
/// live credentials, restarts from now for expired ones, and is a no-op
/// for lifetime keys.
#[tracing::instrument(skip(state, req))]
pub async fn extend_user(
    State(state): State<AppState>,
    Json(req): Json<UserExtendRequest>,
) -> Result<Json<UserExtendResponse>, AuthError> {
    // ---
    let days = validated_days(req.days)?;

    let new_expiry = engine::extend_credential(state.store(), req.user_id, days, Utc::now()).await?;

    Ok(Json(UserExtendResponse {
        status: "success",
        new_expiry,
    }))
}

/// POST /users/delete
#[tracing::instrument(skip(state, req))]
pub async fn delete_user(
    State(state): State<AppState>,
    Json(req): Json<UserDeleteRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    // ---
    match state.store().delete_credential(req.user_id).await {
        Ok(()) => Ok(Json(StatusResponse::success())),
        Err(StoreError::NotFound) => Err(AuthError::NotFound),
        Err(err) => Err(err.into()),
    }
}
