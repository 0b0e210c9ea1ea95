//! Registration and login.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockbook_core::{validate_credentials, NewUser};
use stockbook_db::DbError;
use tracing::{info, warn};

use crate::auth::{dummy_password_hash, hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    validate_credentials(&req.username, &req.password)?;

    // Argon2 hashing blocks; run it off the async workers.
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::storage)??;

    let new_user = NewUser {
        username: req.username,
        password_hash,
        full_name: req.full_name,
        email: req.email,
    }
    .validate()?;

    let user = state
        .db
        .users()
        .insert(&new_user)
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                warn!(username = %new_user.username, "Registration with taken username");
                ApiError::conflict("Username already exists")
            }
            other => other.into(),
        })?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(RegisterResponse { id: user.id })))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    let username = req.username.trim();

    let user = state.db.users().find_by_username(username).await?;

    // Unknown usernames cost one Argon2 verification, same as a wrong password.
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let password = req.password;
    let valid = tokio::task::spawn_blocking(move || {
        match stored_hash.as_deref() {
            Some(hash) => verify_password(&password, hash),
            None => verify_password(&password, dummy_password_hash()),
        }
    })
    .await
    .map_err(ApiError::storage)?;

    let user = user.filter(|_| valid);

    let Some(user) = user else {
        warn!(username = %username, "Failed login");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let token = state.jwt.generate_access_token(user.id, &user.username)?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}
