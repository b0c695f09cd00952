//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use slate_core::error::CoreError;
use slate_core::timezone::local_day;
use slate_core::types::{DbId, Day, Timestamp};
use slate_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Extraction also upserts the `users` row, so every authenticated handler
/// can rely on `user_id` existing.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Internal database id.
    pub user_id: DbId,
    /// The identity provider's subject.
    pub external_id: String,
    pub email: Option<String>,
    /// IANA timezone name used to resolve "today".
    pub timezone: String,
}

impl AuthUser {
    /// The user's local calendar day at `now`.
    pub fn day_at(&self, now: Timestamp) -> Day {
        local_day(now, &self.timezone)
    }

    /// The user's local calendar day right now.
    pub fn today(&self) -> Day {
        self.day_at(Utc::now())
    }
}

/// Verify `token` and resolve it to a user row.
///
/// Shared by the header extractor and the WebSocket upgrade, which carries
/// the token in the query string.
pub async fn authenticate(state: &AppState, token: &str) -> AppResult<AuthUser> {
    let claims = validate_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    let user =
        UserRepo::upsert_by_external_id(&state.pool, &claims.sub, claims.email.as_deref()).await?;

    Ok(AuthUser {
        user_id: user.id,
        external_id: user.external_id,
        email: user.email,
        timezone: user.timezone,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        authenticate(state, token).await
    }
}
