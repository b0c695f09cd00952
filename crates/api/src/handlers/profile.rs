//! Handlers for the caller's own profile (`/me`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use slate_core::error::CoreError;
use slate_core::timezone::parse_timezone;
use slate_core::validation::normalize_username;
use slate_db::models::user::UpdateProfile;
use slate_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse { data: user }))
}

/// PATCH /api/v1/me
///
/// Usernames are lowercased and must be unique; timezones must be IANA names.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.as_deref().map(normalize_username).transpose()?;
    let timezone = input
        .timezone
        .as_deref()
        .map(|tz| parse_timezone(tz).map(|tz| tz.name().to_string()))
        .transpose()?;

    if let Some(name) = &username {
        if let Some(existing) = UserRepo::find_by_username(&state.pool, name).await? {
            if existing.id != auth.user_id {
                return Err(AppError::Core(CoreError::Conflict(
                    "Username is already taken".into(),
                )));
            }
        }
    }

    let user = UserRepo::update_profile(
        &state.pool,
        auth.user_id,
        username.as_deref(),
        timezone.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    }))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");

    Ok(Json(DataResponse { data: user }))
}
