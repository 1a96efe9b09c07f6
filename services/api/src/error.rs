//! API error type and HTTP status mapping

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::jwt::TokenError;
use crate::service::RecipeError;

/// Errors surfaced by request handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request body or field
    #[error("{0}")]
    Validation(String),

    /// No matching record
    #[error("{0}")]
    NotFound(String),

    /// Username already taken
    #[error("username already exists")]
    Conflict,

    /// Credentials rejected; never says which check failed
    #[error("invalid username or password")]
    Unauthorized,

    /// Bearer token malformed, forged, or expired
    #[error("invalid token")]
    InvalidToken,

    /// Refresh requested while too much validity remains
    #[error("token is not expired yet")]
    NotYetExpired,

    /// No live session on a protected route
    #[error("not logged in")]
    NotLoggedIn,

    /// The persistent store failed
    #[error("store error")]
    Store(#[source] anyhow::Error),

    /// The cache layer failed
    #[error("cache error")]
    Cache(#[source] anyhow::Error),

    /// Anything else that should not reach the client in detail
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::NotFound(_)
            | ApiError::Conflict
            | ApiError::NotYetExpired => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::NotLoggedIn => StatusCode::FORBIDDEN,
            ApiError::Store(_) | ApiError::Cache(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) | ApiError::Cache(e) | ApiError::Internal(e) => {
                error!("{}: {:#}", self, e);
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::NotFound => ApiError::NotFound("recipe not found".to_string()),
            RecipeError::Store(e) => ApiError::Store(e),
            RecipeError::Cache(e) => ApiError::Cache(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ApiError::InvalidToken,
            TokenError::NotYetExpired => ApiError::NotYetExpired,
            TokenError::Signing(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
