use serde::{Deserialize, Serialize};
use slate_core::focus::FocusCategory;
use slate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A user's own categorization of an app or site.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FocusApp {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub category: FocusCategory,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFocusApp {
    pub name: String,
    pub category: FocusCategory,
}
