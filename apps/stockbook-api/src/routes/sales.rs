//! Sale endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stockbook_core::{NewSale, Sale};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/sales`, newest first.
pub async fn list_sales(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Sale>>> {
    let sales = state.db.sales().list(auth.user_id).await?;
    Ok(Json(sales))
}

/// `POST /api/sales`
///
/// 409 `INSUFFICIENT_STOCK` when the product has fewer units than requested;
/// in that case nothing is written.
pub async fn record_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let Json(input) = payload?;
    let sale = state.db.sales().record_sale(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// `GET /api/sales/:id`
pub async fn get_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Sale>> {
    let Path(id) = id?;
    state
        .db
        .sales()
        .get(auth.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}
