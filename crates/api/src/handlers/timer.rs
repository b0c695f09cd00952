//! Handlers for the server-owned focus timer.
//!
//! Every state change goes through [`UserStatusRepo`] under a row lock and,
//! when something actually changed, is pushed to the user's sockets and to
//! their party co-members.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use slate_core::error::CoreError;
use slate_core::timer::{TimerState, Transition};
use slate_db::models::focus_session::FocusSession;
use slate_db::models::user_status::StatusView;
use slate_db::repositories::UserStatusRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::publish_status;

/// Run one transition and publish it if it changed the timer.
async fn run_transition<F>(
    state: &AppState,
    auth: &AuthUser,
    step: F,
) -> AppResult<(StatusView, Transition)>
where
    F: FnOnce(&mut TimerState) -> Transition,
{
    let (status, transition) = UserStatusRepo::transition(&state.pool, auth.user_id, step).await?;
    let view = status.view(Utc::now());

    if transition.changed() {
        tracing::info!(user_id = auth.user_id, ?transition, "Timer transition");
        publish_status(&state.pool, &state.ws_manager, &view).await;
    }
    Ok((view, transition))
}

/// GET /api/v1/timer
pub async fn get_timer(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let status = UserStatusRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: status.view(Utc::now()),
    }))
}

/// POST /api/v1/timer/start
pub async fn start_timer(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let (view, _) = run_transition(&state, &auth, |t| t.start(Utc::now())).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/timer/pause
pub async fn pause_timer(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let (view, _) = run_transition(&state, &auth, |t| t.pause(Utc::now())).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/timer/heartbeat
///
/// 409 tells a client its timer was paused elsewhere.
pub async fn heartbeat(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let (view, transition) = run_transition(&state, &auth, |t| t.heartbeat(Utc::now())).await?;
    if transition == Transition::Unchanged {
        return Err(AppError::Core(CoreError::Conflict(
            "Timer is not running".into(),
        )));
    }
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/timer/external-stop
pub async fn external_stop(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let (view, _) = run_transition(&state, &auth, |t| t.external_stop(Utc::now())).await?;
    Ok(Json(DataResponse { data: view }))
}

#[derive(Debug, Serialize)]
pub struct StopResult {
    pub status: StatusView,
    /// The recorded session, absent for zero-length or duplicate stops.
    pub session: Option<FocusSession>,
}

/// POST /api/v1/timer/stop
pub async fn stop_timer(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let (status, transition, session) =
        UserStatusRepo::stop(&state.pool, auth.user_id, now, auth.day_at(now)).await?;
    let view = status.view(now);

    tracing::info!(
        user_id = auth.user_id,
        ?transition,
        session_id = session.as_ref().map(|s| s.id),
        "Timer stopped"
    );
    publish_status(&state.pool, &state.ws_manager, &view).await;

    Ok(Json(DataResponse {
        data: StopResult {
            status: view,
            session,
        },
    }))
}
