//! Public client login endpoint.
//!
//! Unlike the management endpoints, every failure here shares one body
//! shape (`{"success": false, "message": ...}`) under HTTP 200, so a
//! probing client cannot tell which stage rejected it.

use crate::app_state::AppState;
use crate::domain::AuthError;
use crate::engine::{self, LoginAttempt};
use axum::extract::{ConnectInfo, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClientLoginRequest {
    // ---
    pub owner_id: Uuid,
    pub app_secret: String,
    pub username: String,
    pub password: String,
    pub hwid: String,
}

#[derive(Debug, Serialize)]
pub struct ClientLoginResponse {
    // ---
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<LoginInfo>,
}

#[derive(Debug, Serialize)]
pub struct LoginInfo {
    // ---
    pub expires: DateTime<Utc>,
}

impl ClientLoginResponse {
    // ---
    fn failure(message: &str) -> Self {
        // ---
        Self {
            success: false,
            message: message.to_string(),
            info: None,
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

/// POST /api/1.0/user_login
///
/// Validates a credential against an application and, on first successful
/// login, permanently binds the supplied HWID.
#[tracing::instrument(skip(state, req))]
pub async fn user_login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<ClientLoginRequest>,
) -> Json<ClientLoginResponse> {
    // ---
    // Empty fields can never authenticate; reject in the uniform shape.
    if req.username.is_empty() || req.password.is_empty() || req.hwid.is_empty() {
        state.metrics().record_login(false);
        return Json(ClientLoginResponse::failure("Invalid credentials."));
    }

    let attempt = LoginAttempt {
        owner_id: req.owner_id,
        app_secret: req.app_secret,
        username: req.username,
        password: req.password,
        hwid: req.hwid,
        client_ip: addr.ip().to_string(),
    };

    match engine::authenticate(state.store(), state.notifier(), attempt, Utc::now()).await {
        Ok(grant) => {
            state.metrics().record_login(true);
            Json(ClientLoginResponse {
                success: true,
                message: "Login successful.".to_string(),
                info: Some(LoginInfo {
                    expires: grant.expires_at,
                }),
            })
        }
        Err(AuthError::Internal(err)) => {
            state.metrics().record_login(false);
            tracing::error!("client login failed on backend error: {err:?}");
            Json(ClientLoginResponse::failure(
                "Login failed, try again later.",
            ))
        }
        Err(err) => {
            state.metrics().record_login(false);
            Json(ClientLoginResponse::failure(&err.to_string()))
        }
    }
}
