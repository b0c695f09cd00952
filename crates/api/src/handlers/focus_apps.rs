//! Handlers for the user's app/site categorization list and the classify
//! endpoint the companion tracker polls.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use slate_core::error::CoreError;
use slate_core::focus::{categorize, normalize_item, FocusCategory, FOCUS_APP_NAME_MAX};
use slate_core::types::DbId;
use slate_db::models::focus_app::CreateFocusApp;
use slate_db::repositories::FocusAppRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn normalized(item: &str) -> Result<String, CoreError> {
    let key = normalize_item(item)
        .ok_or_else(|| CoreError::Validation("item must be an app id or URL".into()))?;
    if key.chars().count() > FOCUS_APP_NAME_MAX {
        return Err(CoreError::Validation(format!(
            "item must be at most {FOCUS_APP_NAME_MAX} characters"
        )));
    }
    Ok(key)
}

/// GET /api/v1/focus-apps
pub async fn list_focus_apps(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let apps = FocusAppRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: apps }))
}

/// POST /api/v1/focus-apps
pub async fn create_focus_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFocusApp>,
) -> AppResult<impl IntoResponse> {
    if input.category == FocusCategory::Unknown {
        return Err(AppError::Core(CoreError::Validation(
            "category must be productive or unproductive".into(),
        )));
    }
    let name = normalized(&input.name)?;

    let app = FocusAppRepo::create(&state.pool, auth.user_id, &name, input.category).await?;
    tracing::info!(
        focus_app_id = app.id,
        user_id = auth.user_id,
        category = app.category.as_str(),
        "Focus app categorized"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: app })))
}

/// DELETE /api/v1/focus-apps/{id}
pub async fn delete_focus_app(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FocusAppRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "FocusApp",
            id,
        }));
    }
    Ok(Json(DataResponse::deleted()))
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub item: String,
}

#[derive(Debug, Serialize)]
pub struct Classification {
    pub item: String,
    pub category: FocusCategory,
}

/// POST /api/v1/focus-apps/classify
pub async fn classify(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ClassifyRequest>,
) -> AppResult<impl IntoResponse> {
    let key = normalized(&input.item)?;
    let mine = FocusAppRepo::list(&state.pool, auth.user_id).await?;
    let category = categorize(&key, mine.iter().map(|a| (a.name.as_str(), a.category)));

    tracing::debug!(user_id = auth.user_id, item = %key, category = category.as_str(), "Classified");
    Ok(Json(DataResponse {
        data: Classification { item: key, category },
    }))
}
