use super::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Every way a management or login request can fail.
///
/// Management endpoints map variants to distinct HTTP statuses with a JSON
/// `error` body. The client login endpoint instead collapses all variants
/// into a uniform `{success: false, message}` shape (see
/// `handlers::client_api`) so callers cannot enumerate which stage
/// rejected them.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Seller username already taken.")]
    SellerExists,

    #[error("Seller not found.")]
    SellerNotFound,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Username already exists for this application.")]
    DuplicateUsername,

    #[error("Invalid application details.")]
    InvalidApplication,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Subscription has expired.")]
    SubscriptionExpired,

    #[error("HWID mismatch.")]
    HwidMismatch,

    #[error("Not found.")]
    NotFound,

    /// Boundary rejection: the request never reached the engine.
    #[error("{0}")]
    Validation(String),

    #[error("Internal server error.")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    // ---
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            AuthError::SellerExists | AuthError::DuplicateUsername => StatusCode::CONFLICT,
            AuthError::SellerNotFound | AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidPassword
            | AuthError::InvalidApplication
            | AuthError::InvalidCredentials
            | AuthError::SubscriptionExpired
            | AuthError::HwidMismatch => StatusCode::BAD_REQUEST,
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Backend failures become `Internal`; `Conflict` and `NotFound` must be
/// mapped by the call site, where the right variant is known.
impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        // ---
        AuthError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // ---
        // Backend details stay in the logs; clients get the generic message.
        if let AuthError::Internal(err) = &self {
            tracing::error!("internal error: {err:?}");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn conflict_variants_map_to_409() {
        // ---
        assert_eq!(AuthError::SellerExists.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::DuplicateUsername.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn lookup_misses_map_to_404() {
        // ---
        assert_eq!(AuthError::SellerNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_backend_error_becomes_internal() {
        // ---
        let err: AuthError = StoreError::Backend(anyhow::anyhow!("pool timeout")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
