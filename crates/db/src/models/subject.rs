use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::task::Task;

/// A row from the `subjects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub color: String,
    pub expanded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A subject together with its tasks, newest task first.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectWithTasks {
    #[serde(flatten)]
    pub subject: Subject,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    /// Defaults to the sky color token if omitted.
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub color: Option<String>,
    pub expanded: Option<bool>,
}
