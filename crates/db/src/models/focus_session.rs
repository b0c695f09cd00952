use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Day, Timestamp};
use sqlx::FromRow;

/// A recorded stretch of focused study.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FocusSession {
    pub id: DbId,
    pub user_id: DbId,
    /// The user's local calendar day when the session ended.
    pub session_date: Day,
    pub duration_secs: i64,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

/// Body of `POST /focus-sessions`. `session_date` defaults to the user's
/// local today.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFocusSession {
    pub duration_secs: i64,
    pub session_date: Option<Day>,
}
