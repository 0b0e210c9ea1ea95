//! Inventory ledger endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stockbook_core::{NewProduct, Product, ProductUpdate};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/products`
pub async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list(auth.user_id).await?;
    Ok(Json(products))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let product = state.db.products().create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/:id`
pub async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    state
        .db
        .products()
        .get(auth.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// `PATCH /api/products/:id`
///
/// Name and purchase price only; stock changes go through sales.
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let Json(update) = payload?;
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let product = state
        .db
        .products()
        .update_details(auth.user_id, id, update)
        .await?;
    Ok(Json(product))
}

/// `DELETE /api/products/:id`
///
/// Always 204, whether or not anything was deleted.
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.db.products().delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
