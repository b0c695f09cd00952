//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use slate_core::planner::{Priority, Schedulable};
use slate_core::types::{DbId, Day, Timestamp};
use sqlx::FromRow;

use crate::models::nullable;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub subject_id: DbId,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub done: bool,
    pub due_date: Option<Day>,
    pub pinned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Schedulable for Task {
    fn due_date(&self) -> Option<Day> {
        self.due_date
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// An open task due today, joined with its subject for the banner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueTodayTask {
    pub id: DbId,
    pub subject_id: DbId,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub due_date: Option<Day>,
    pub pinned: bool,
    pub subject_name: String,
    pub subject_color: String,
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub subject_id: DbId,
    pub priority: Option<Priority>,
    pub done: Option<bool>,
    pub due_date: Option<Day>,
    pub pinned: Option<bool>,
}

/// DTO for patching a task. `due_date: null` clears the date; an absent
/// `due_date` leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub subject_id: Option<DbId>,
    pub priority: Option<Priority>,
    pub done: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<Day>>,
    pub pinned: Option<bool>,
}
