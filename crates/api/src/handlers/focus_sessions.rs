//! Handlers for recorded focus sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_core::validation::validate_positive_secs;
use slate_db::models::focus_session::CreateFocusSession;
use slate_db::repositories::FocusSessionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/focus-sessions
pub async fn list_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sessions = FocusSessionRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/focus-sessions
///
/// Manual entry; the timer records its own sessions on stop.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFocusSession>,
) -> AppResult<impl IntoResponse> {
    validate_positive_secs(input.duration_secs, "duration_secs")?;
    let session_date = input.session_date.unwrap_or_else(|| auth.today());

    let session =
        FocusSessionRepo::create(&state.pool, auth.user_id, session_date, input.duration_secs)
            .await?;

    tracing::info!(
        session_id = session.id,
        user_id = auth.user_id,
        duration_secs = session.duration_secs,
        "Focus session recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// DELETE /api/v1/focus-sessions/{id}
pub async fn delete_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FocusSessionRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FocusSession",
            id,
        }));
    }
    Ok(Json(DataResponse::deleted()))
}
