use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Day, Timestamp};
use sqlx::FromRow;

/// A calendar event from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub event_date: Day,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub event_date: Day,
    pub color: String,
}
