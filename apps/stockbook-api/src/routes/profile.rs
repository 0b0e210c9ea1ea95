//! The caller's own profile.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use stockbook_core::{ProfileUpdate, UserProfile};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let user = state
        .db
        .users()
        .get(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", auth.user_id))?;

    Ok(Json(user.profile()))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<UserProfile>> {
    let Json(update) = payload?;
    let update = update.validate()?;

    let user = state.db.users().update_profile(auth.user_id, &update).await?;

    Ok(Json(user.profile()))
}
