//! Handlers for today's todo list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_core::validation::{validate_text, TITLE_MAX};
use slate_db::models::daily_todo::CreateDailyTodo;
use slate_db::repositories::DailyTodoRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "DailyTodo",
        id,
    })
}

/// GET /api/v1/daily-todos
pub async fn list_todos(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let todos = DailyTodoRepo::list_for_day(&state.pool, auth.user_id, auth.today()).await?;
    Ok(Json(DataResponse { data: todos }))
}

/// POST /api/v1/daily-todos
pub async fn create_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDailyTodo>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    validate_text(title, "title", TITLE_MAX)?;

    let todo = DailyTodoRepo::create(&state.pool, auth.user_id, title, auth.today()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: todo })))
}

/// POST /api/v1/daily-todos/{id}/toggle
pub async fn toggle_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let todo = DailyTodoRepo::toggle(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: todo }))
}

/// DELETE /api/v1/daily-todos/{id}
pub async fn delete_todo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !DailyTodoRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(DataResponse::deleted()))
}
