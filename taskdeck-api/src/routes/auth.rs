/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login (issues the session cookie)
/// - Logout (clears the session cookie)
/// - Session probe (`/auth/me`)
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and receive the session cookie
/// - `POST /auth/logout` - Clear the session cookie
/// - `GET /auth/me` - Return the authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        password,
        session::{CurrentUser, SESSION_COOKIE},
        token::{self, Claims},
    },
    models::user::{CreateUser, User, UserProfile},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response wrapper for the public user fields
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The user, never including the password hash
    pub user: UserProfile,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Always a confirmation; logout never reports failure
    pub message: String,
}

/// Builds the session cookie carrying a freshly signed token
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Builds the removal cookie that clears the session
fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Register a new user
///
/// Creates the account and returns its public fields. Registration does
/// not log the user in; no session cookie is set.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "jane",
///   "email": "jane@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed email, short username/password, or
///   email already registered
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.trim().to_string(),
            username: req.username.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse { user: user.into() }),
    ))
}

/// Login endpoint
///
/// Verifies credentials and sets the session cookie. The same 401 body is
/// returned for an unknown email and a wrong password so responses cannot
/// be used to enumerate accounts.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "jane@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed request
/// - `401 Unauthorized`: invalid credentials
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = Claims::new(user.id, state.config.session_ttl());
    let token = token::create_token(&claims, state.session_secret())?;

    Ok((
        jar.add(session_cookie(token)),
        Json(UserResponse { user: user.into() }),
    ))
}

/// Logout endpoint
///
/// Clears the session cookie. Succeeds unconditionally: an absent,
/// expired, or garbage token still ends the client-visible session, which
/// is why this route sits outside the auth layer.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.remove(clear_session_cookie()),
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Session probe
///
/// Returns the user the current session resolves to. The client calls
/// this on startup to decide between the authenticated and anonymous
/// states.
///
/// # Errors
///
/// - `401 Unauthorized`: no valid session
pub async fn me(Extension(auth): Extension<CurrentUser>) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse { user: auth.into() }))
}
