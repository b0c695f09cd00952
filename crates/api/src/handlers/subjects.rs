//! Handlers for subjects. Every response carries the subject's tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use slate_core::error::CoreError;
use slate_core::planner::DEFAULT_SUBJECT_COLOR;
use slate_core::types::DbId;
use slate_core::validation::{
    validate_text, COLOR_MAX, SUBJECT_NAME_MAX_CREATE, SUBJECT_NAME_MAX_UPDATE,
};
use slate_db::models::subject::{CreateSubject, SubjectWithTasks, UpdateSubject};
use slate_db::repositories::SubjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Subject",
        id,
    })
}

/// GET /api/v1/subjects
pub async fn list_subjects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subjects = SubjectRepo::list_with_tasks(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: subjects }))
}

/// POST /api/v1/subjects
pub async fn create_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSubject>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    validate_text(name, "name", SUBJECT_NAME_MAX_CREATE)?;
    let color = match input.color.as_deref() {
        Some(c) => {
            validate_text(c, "color", COLOR_MAX)?;
            c
        }
        None => DEFAULT_SUBJECT_COLOR,
    };

    let subject = SubjectRepo::create(&state.pool, auth.user_id, name, color).await?;
    tracing::info!(subject_id = subject.id, user_id = auth.user_id, "Subject created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubjectWithTasks {
                subject,
                tasks: Vec::new(),
            },
        }),
    ))
}

/// PATCH /api/v1/subjects/{id}
pub async fn update_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateSubject>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = input.name.as_mut() {
        *name = name.trim().to_string();
        validate_text(name, "name", SUBJECT_NAME_MAX_UPDATE)?;
    }
    if let Some(color) = &input.color {
        validate_text(color, "color", COLOR_MAX)?;
    }

    SubjectRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let subject = SubjectRepo::find_with_tasks(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(subject_id = id, user_id = auth.user_id, "Subject updated");
    Ok(Json(DataResponse { data: subject }))
}

/// DELETE /api/v1/subjects/{id}
///
/// The subject's tasks go with it.
pub async fn delete_subject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SubjectRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(subject_id = id, user_id = auth.user_id, "Subject deleted");
    Ok(Json(DataResponse::deleted()))
}
