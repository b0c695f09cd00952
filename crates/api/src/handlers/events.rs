//! Handlers for calendar events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_core::validation::{validate_text, COLOR_MAX, TITLE_MAX};
use slate_db::models::event::CreateEvent;
use slate_db::repositories::EventRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events?from=&to=
pub async fn list_events(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(AppError::BadRequest("`from` must not be after `to`".into()));
        }
    }
    let events = EventRepo::list(&state.pool, auth.user_id, range.from, range.to).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    validate_text(&input.title, "title", TITLE_MAX)?;
    validate_text(&input.color, "color", COLOR_MAX)?;

    let event = EventRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(event_id = event.id, user_id = auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// DELETE /api/v1/events/{id}
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EventRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Event", id }));
    }
    tracing::info!(event_id = id, user_id = auth.user_id, "Event deleted");
    Ok(Json(DataResponse::deleted()))
}
