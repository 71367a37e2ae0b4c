//! Seller panel endpoints: registration, login, and account deletion.

use crate::app_state::AppState;
use crate::domain::{AuthError, Seller, StoreError};
use crate::handlers::shared_types::StatusResponse;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SellerAuthRequest {
    // ---
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SellerLoginResponse {
    // ---
    pub status: &'static str,
    pub owner_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SellerDeleteRequest {
    // ---
    pub owner_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
///
/// Registers a new seller. The password is argon2id-hashed before it ever
/// reaches the store; a generated owner id becomes the seller's tenant key.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<SellerAuthRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    // ---
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AuthError::Validation(
            "username and password must be non-empty".to_string(),
        ));
    }

    let password_hash = state.hasher().hash(&req.password)?;
    let seller = Seller::new(username.to_string(), password_hash);

    match state.store().create_seller(seller).await {
        Ok(()) => {
            tracing::info!("seller registered: {username}");
            Ok(Json(StatusResponse::success()))
        }
        Err(StoreError::Conflict) => Err(AuthError::SellerExists),
        Err(err) => Err(err.into()),
    }
}

/// POST /login
///
/// Verifies a seller's password and returns the owner id used by every
/// management endpoint.
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<SellerAuthRequest>,
) -> Result<Json<SellerLoginResponse>, AuthError> {
    // ---
    let seller = state
        .store()
        .get_seller_by_username(req.username.trim())
        .await?
        .ok_or(AuthError::SellerNotFound)?;

    if !state.hasher().verify(&req.password, &seller.password_hash)? {
        return Err(AuthError::InvalidPassword);
    }

    Ok(Json(SellerLoginResponse {
        status: "success",
        owner_id: seller.owner_id,
    }))
}

/// POST /sellers/delete
///
/// Deletes a seller together with its applications and their credentials.
#[tracing::instrument(skip(state, req))]
pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<SellerDeleteRequest>,
) -> Result<Json<StatusResponse>, AuthError> {
    // ---
    match state.store().delete_seller(req.owner_id).await {
        Ok(()) => {
            tracing::info!("seller deleted: {}", req.owner_id);
            Ok(Json(StatusResponse::success()))
        }
        Err(StoreError::NotFound) => Err(AuthError::SellerNotFound),
        Err(err) => Err(err.into()),
    }
}
