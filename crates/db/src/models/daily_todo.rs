use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Day, Timestamp};
use sqlx::FromRow;

/// A row from the `daily_todos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyTodo {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub done: bool,
    pub todo_date: Day,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDailyTodo {
    pub title: String,
}
