//! Route definitions for the planner resources: subjects, tasks, calendar
//! events, and daily todos.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{daily_todos, events, subjects, tasks};
use crate::state::AppState;

/// Routes mounted at `/subjects`.
///
/// ```text
/// GET    /        -> list_subjects
/// POST   /        -> create_subject
/// PATCH  /{id}    -> update_subject
/// DELETE /{id}    -> delete_subject
/// ```
pub fn subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(subjects::list_subjects).post(subjects::create_subject))
        .route(
            "/{id}",
            patch(subjects::update_subject).delete(subjects::delete_subject),
        )
}

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /            -> list_tasks  (?sort=created|due_date|priority&subject_id=)
/// POST   /            -> create_task
/// GET    /stats       -> get_task_stats
/// GET    /due-today   -> list_due_today
/// GET    /{id}        -> get_task
/// PATCH  /{id}        -> update_task
/// DELETE /{id}        -> delete_task
/// ```
pub fn tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/stats", get(tasks::get_task_stats))
        .route("/due-today", get(tasks::list_due_today))
        .route(
            "/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
}

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /        -> list_events  (?from=&to=)
/// POST   /        -> create_event
/// DELETE /{id}    -> delete_event
/// ```
pub fn events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/{id}", delete(events::delete_event))
}

/// Routes mounted at `/daily-todos`.
///
/// ```text
/// GET    /              -> list_todos
/// POST   /              -> create_todo
/// POST   /{id}/toggle   -> toggle_todo
/// DELETE /{id}          -> delete_todo
/// ```
pub fn daily_todos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(daily_todos::list_todos).post(daily_todos::create_todo))
        .route("/{id}/toggle", post(daily_todos::toggle_todo))
        .route("/{id}", delete(daily_todos::delete_todo))
}
