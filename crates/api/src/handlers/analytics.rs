//! Personal focus analytics: summary totals, the daily chart, and the
//! contribution-style heatmap.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use slate_core::analytics::{
    focus_summary, heatmap, validate_days, window_start, HEATMAP_ROLLING_DAYS, MONTH_DAYS,
    WEEK_DAYS,
};
use slate_db::repositories::FocusSessionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DaysParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HeatmapParams {
    pub year: Option<i32>,
}

/// GET /api/v1/analytics/focus?days=N
pub async fn focus_analytics(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DaysParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days_or(WEEK_DAYS);
    validate_days(days)?;

    let today = auth.today();
    let start = window_start(today, days.max(MONTH_DAYS));
    let totals = FocusSessionRepo::daily_totals(&state.pool, auth.user_id, start, today).await?;

    Ok(Json(DataResponse {
        data: focus_summary(&totals, today, days),
    }))
}

/// GET /api/v1/analytics/heatmap?year=
///
/// Without `year`, the last 365 days ending today.
pub async fn focus_heatmap(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HeatmapParams>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = match params.year {
        Some(year) => {
            let bounds = NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year, 12, 31));
            bounds.ok_or_else(|| AppError::BadRequest(format!("Invalid year {year}")))?
        }
        None => {
            let today = auth.today();
            (window_start(today, HEATMAP_ROLLING_DAYS), today)
        }
    };

    let totals = FocusSessionRepo::daily_totals(&state.pool, auth.user_id, start, end).await?;
    Ok(Json(DataResponse {
        data: heatmap(&totals, start, end),
    }))
}
