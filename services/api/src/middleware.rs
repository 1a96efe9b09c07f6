//! Session gate for protected endpoints

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "recipe_session";

/// Fallback header for non-browser clients
pub const SESSION_HEADER: &str = "x-session-token";

/// The session a request was authenticated with
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub username: String,
}

/// Reject requests without a live session before they reach a handler
pub async fn session_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&jar, req.headers()).ok_or(ApiError::NotLoggedIn)?;

    let username = state
        .sessions
        .lookup(&token)
        .await
        .map_err(ApiError::Cache)?
        .ok_or(ApiError::NotLoggedIn)?;

    req.extensions_mut()
        .insert(CurrentSession { token, username });

    Ok(next.run(req).await)
}

/// Pull the session token from the cookie or the fallback header
fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
