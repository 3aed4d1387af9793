//! Account endpoints.
//!
//! - POST /api/v1/auth/register
//! - POST /api/v1/auth/login
//! - POST /api/v1/auth/logout
//!
//! Sessions are DB-backed: login stores an opaque UUID token and hands it to
//! the client as an HttpOnly cookie, logout deletes the row and expires the
//! cookie. Passwords are stored as Argon2 PHC strings, never in plaintext.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    /// Account name, unique across users
    pub username: String,
    /// Raw password; only its Argon2 hash is stored
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Newly assigned user id
    pub id: i64,
    /// Registered username
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Logged-in username
    pub username: String,
}

// ---------------------------------------------------------------------------
// Password hashing
// ---------------------------------------------------------------------------

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC string.
///
/// An unparsable stored hash verifies as false rather than erroring; the
/// caller cannot distinguish it from a wrong password, which is the point.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Cookie helpers
// ---------------------------------------------------------------------------

/// Extract the session token from a request's Cookie header, if present.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        SESSION_COOKIE, token
    )
}

fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Empty username or password", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let username = credentials.username.trim();
    if username.is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest(
            "username and password must not be empty".to_string(),
        ));
    }

    let password_hash = hash_password(&credentials.password)?;

    let id = match queries::create_user(&state.pool, username, &password_hash).await {
        Ok(id) => id,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("registered user '{}' (id={})", username, id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id,
            username: username.to_string(),
        }),
    ))
}

/// Log in and establish a session.
///
/// Unknown username and wrong password produce the same 401 so the endpoint
/// does not leak which usernames exist.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    let user = queries::find_user_by_username(&state.pool, credentials.username.trim())
        .await?
        .filter(|u| verify_password(&credentials.password, &u.password_hash))
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    let token = Uuid::new_v4().to_string();
    queries::create_session(&state.pool, &token, user.id).await?;

    tracing::info!("user '{}' logged in", user.username);

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        session_cookie(&token)
            .parse()
            .map_err(|e| AppError::InternalError(format!("invalid cookie value: {}", e)))?,
    );

    Ok((
        headers,
        Json(LoginResponse {
            username: user.username,
        }),
    ))
}

/// Log out: drop the session row and expire the cookie.
///
/// Always succeeds, even without a valid session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Session cleared"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, HeaderMap), AppError> {
    if let Some(token) = session_token_from_headers(&headers) {
        queries::delete_session(&state.pool, &token).await?;
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        SET_COOKIE,
        expired_session_cookie()
            .parse()
            .map_err(|e| AppError::InternalError(format!("invalid cookie value: {}", e)))?,
    );

    Ok((StatusCode::NO_CONTENT, response_headers))
}
