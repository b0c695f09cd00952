//! Handlers for starting and stopping the companion focus tracker.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::jwt::issue_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::tracker::TrackerAction;

/// Lifetime of the token handed to the tracker process.
const TRACKER_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct TrackerRequest {
    pub action: TrackerAction,
}

/// POST /api/v1/focus-tracker
pub async fn control_tracker(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TrackerRequest>,
) -> AppResult<impl IntoResponse> {
    let status = match input.action {
        TrackerAction::Start => {
            let token = issue_token(
                &auth.external_id,
                auth.email.as_deref(),
                TRACKER_TOKEN_TTL_SECS,
                &state.config.jwt,
            )
            .map_err(|e| AppError::InternalError(format!("tracker token: {e}")))?;
            state.tracker.start(auth.user_id, &token).await?
        }
        TrackerAction::Stop => state.tracker.stop().await?,
        TrackerAction::Status => state.tracker.status().await,
    };
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/focus-tracker
pub async fn tracker_status(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.tracker.status().await,
    }))
}
