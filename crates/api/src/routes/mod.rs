pub mod focus;
pub mod health;
pub mod parties;
pub mod planner;
pub mod profile;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree. Everything except `/ws` authenticates
/// through the `Authorization: Bearer` header; `/ws` takes `?token=`.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (status_changed pushes)
///
/// /me                                   get, update profile
///
/// /subjects                             list (with tasks), create
/// /subjects/{id}                        update, delete
///
/// /tasks                                list, create
/// /tasks/stats                          completion stats
/// /tasks/due-today                      open tasks due today
/// /tasks/{id}                           get, update, delete
///
/// /events                               list (?from=&to=), create
/// /events/{id}                          delete
///
/// /daily-todos                          list today's, create
/// /daily-todos/{id}/toggle              flip done
/// /daily-todos/{id}                     delete
///
/// /focus-sessions                       list, create
/// /focus-sessions/{id}                  delete
///
/// /analytics/focus                      summary and daily chart (?days=N)
/// /analytics/heatmap                    contribution heatmap (?year=)
///
/// /timer                                current status
/// /timer/{start,pause,heartbeat,stop}   transitions
/// /timer/external-stop                  pause from the focus tracker
///
/// /focus-apps                           list, create
/// /focus-apps/classify                  categorize an app or URL
/// /focus-apps/{id}                      delete
///
/// /focus-tracker                        status, start/stop/status action
///
/// /parties                              list, create
/// /parties/{id}                         rename, delete (creator only)
/// /parties/{id}/members                 add by email or username
/// /parties/{id}/members/{user_id}       remove
/// /parties/{id}/leave                   leave (creator leaving deletes)
/// /parties/{id}/stats                   7-day leaderboard
/// /parties/{id}/statuses                live member timers
/// /parties/{id}/daily                   per-member daily minutes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/me", profile::router())
        // Planner.
        .nest("/subjects", planner::subjects_router())
        .nest("/tasks", planner::tasks_router())
        .nest("/events", planner::events_router())
        .nest("/daily-todos", planner::daily_todos_router())
        // Focus tracking.
        .nest("/focus-sessions", focus::sessions_router())
        .nest("/analytics", focus::analytics_router())
        .nest("/timer", focus::timer_router())
        .nest("/focus-apps", focus::focus_apps_router())
        .nest("/focus-tracker", focus::tracker_router())
        // Study parties.
        .nest("/parties", parties::router())
}
