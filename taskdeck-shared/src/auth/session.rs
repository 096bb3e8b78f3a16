/// Session resolution
///
/// Every task-scoped request must resolve its session token to a live user
/// before any handler runs. This module owns that resolution: pulling the
/// token out of the request (cookie first, then bearer header), validating
/// it, and re-fetching the user so a deleted account invalidates its
/// outstanding tokens immediately.
///
/// On success the request carries a [`CurrentUser`]: a resolved,
/// hash-free view of the account that handlers take as a required
/// extension. Handlers never see a "maybe authenticated" state.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::token::{validate_token, TokenError};
use crate::models::user::{User, UserProfile};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// The authenticated user attached to a request
///
/// Constructed only after successful token validation and user lookup, so
/// a handler holding one of these is guaranteed a live account. Never
/// contains the password hash.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID, used to scope every task query
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub username: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

impl From<CurrentUser> for UserProfile {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Error type for session resolution
///
/// Everything except `Database` maps to a 401 at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No token in cookie or Authorization header
    #[error("No session token provided")]
    MissingToken,

    /// Token failed signature/expiry validation
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    /// Token was valid but the user no longer exists
    #[error("Session references an unknown user")]
    UnknownUser,

    /// User lookup failed
    #[error("Database error during session resolution")]
    Database(#[from] sqlx::Error),
}

impl From<TokenError> for SessionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => SessionError::InvalidToken("Token has expired".to_string()),
            other => SessionError::InvalidToken(other.to_string()),
        }
    }
}

/// Extracts the session token from a request's headers
///
/// The `token` cookie wins; `Authorization: Bearer <token>` is the
/// fallback. Returns `None` when neither is present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Resolves a request's session token to the authenticated user
///
/// Validates the token and re-fetches the user, so the returned
/// [`CurrentUser`] reflects the account as stored right now.
///
/// # Errors
///
/// Returns `SessionError` when the token is absent, malformed, expired, or
/// references a user that no longer exists.
pub async fn resolve_session(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<CurrentUser, SessionError> {
    let token = extract_token(headers).ok_or(SessionError::MissingToken)?;

    let claims = validate_token(&token, secret)?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(SessionError::UnknownUser)?;

    Ok(CurrentUser::from(user))
}
