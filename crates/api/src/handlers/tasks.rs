//! Handlers for tasks, the due-today banner, and the task counters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use slate_core::error::CoreError;
use slate_core::planner::{sort_tasks, task_stats, TaskSort};
use slate_core::types::DbId;
use slate_core::validation::{validate_text, TITLE_MAX};
use slate_db::models::task::{CreateTask, UpdateTask};
use slate_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `GET /tasks` query parameters.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    #[serde(default)]
    pub sort: TaskSort,
    pub subject_id: Option<DbId>,
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// GET /api/v1/tasks
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<impl IntoResponse> {
    let mut tasks = TaskRepo::list(&state.pool, auth.user_id, params.subject_id).await?;
    sort_tasks(&mut tasks, params.sort);
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
///
/// The target subject must belong to the caller.
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    input.title = input.title.trim().to_string();
    validate_text(&input.title, "title", TITLE_MAX)?;

    let task = TaskRepo::create(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found("Subject", input.subject_id))?;

    tracing::info!(task_id = task.id, subject_id = task.subject_id, user_id = auth.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRepo::find(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found("Task", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /api/v1/tasks/{id}
///
/// `due_date: null` clears the date. Moving to a subject the caller does not
/// own reads as a missing task.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = input.title.as_mut() {
        *title = title.trim().to_string();
        validate_text(title, "title", TITLE_MAX)?;
    }

    let task = TaskRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found("Task", id))?;

    tracing::info!(task_id = id, user_id = auth.user_id, done = task.done, "Task updated");
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TaskRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found("Task", id));
    }
    tracing::info!(task_id = id, user_id = auth.user_id, "Task deleted");
    Ok(Json(DataResponse::deleted()))
}

/// GET /api/v1/tasks/stats
pub async fn get_task_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let pairs = TaskRepo::completion_pairs(&state.pool, auth.user_id).await?;
    let stats = task_stats(pairs, auth.today());
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/tasks/due-today
pub async fn list_due_today(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list_due_on(&state.pool, auth.user_id, auth.today()).await?;
    Ok(Json(DataResponse { data: tasks }))
}
