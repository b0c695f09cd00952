//! Route definitions for focus tracking: sessions, analytics, the timer,
//! app categorization, and the tracker process.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{analytics, focus_apps, focus_sessions, focus_tracker, timer};
use crate::state::AppState;

/// Routes mounted at `/focus-sessions`.
///
/// ```text
/// GET    /        -> list_sessions
/// POST   /        -> create_session
/// DELETE /{id}    -> delete_session
/// ```
pub fn sessions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(focus_sessions::list_sessions).post(focus_sessions::create_session),
        )
        .route("/{id}", delete(focus_sessions::delete_session))
}

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET    /focus      -> focus_analytics  (?days=N)
/// GET    /heatmap    -> focus_heatmap    (?year=)
/// ```
pub fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/focus", get(analytics::focus_analytics))
        .route("/heatmap", get(analytics::focus_heatmap))
}

/// Routes mounted at `/timer`.
///
/// ```text
/// GET    /                 -> get_timer
/// POST   /start            -> start_timer
/// POST   /pause            -> pause_timer
/// POST   /heartbeat        -> heartbeat
/// POST   /stop             -> stop_timer
/// POST   /external-stop    -> external_stop
/// ```
pub fn timer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(timer::get_timer))
        .route("/start", post(timer::start_timer))
        .route("/pause", post(timer::pause_timer))
        .route("/heartbeat", post(timer::heartbeat))
        .route("/stop", post(timer::stop_timer))
        .route("/external-stop", post(timer::external_stop))
}

/// Routes mounted at `/focus-apps`.
///
/// ```text
/// GET    /            -> list_focus_apps
/// POST   /            -> create_focus_app
/// POST   /classify    -> classify
/// DELETE /{id}        -> delete_focus_app
/// ```
pub fn focus_apps_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(focus_apps::list_focus_apps).post(focus_apps::create_focus_app),
        )
        .route("/classify", post(focus_apps::classify))
        .route("/{id}", delete(focus_apps::delete_focus_app))
}

/// Routes mounted at `/focus-tracker`.
pub fn tracker_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(focus_tracker::tracker_status).post(focus_tracker::control_tracker),
    )
}
