//! Dashboard metrics and the daily report.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use stockbook_core::{DaySummary, MetricsSummary, ValidationError};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// `YYYY-MM-DD`; today (UTC) when absent.
    pub date: Option<String>,
}

/// `GET /api/metrics`
pub async fn metrics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MetricsSummary>> {
    let products = state.db.products().list(auth.user_id).await?;
    let sales = state.db.sales().list(auth.user_id).await?;

    Ok(Json(MetricsSummary::compute(&products, &sales)?))
}

/// `GET /api/reports/daily?date=YYYY-MM-DD`
pub async fn daily(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> ApiResult<Json<DaySummary>> {
    let Query(query) = query?;
    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => Utc::now().date_naive(),
        Some(raw) => parse_day(raw)?,
    };

    let sales = state.db.sales().list(auth.user_id).await?;

    Ok(Json(DaySummary::for_day(&sales, date)?))
}

fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}
