//! Repository for the `focus_apps` table.

use sqlx::PgPool;
use slate_core::focus::FocusCategory;
use slate_core::types::DbId;

use crate::models::focus_app::FocusApp;

const COLUMNS: &str = "id, user_id, name, category, created_at";

pub struct FocusAppRepo;

impl FocusAppRepo {
    /// Insert an entry. `name` must already be normalized. A repeat name for
    /// the same user violates `uq_focus_apps_user_name`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
        category: FocusCategory,
    ) -> Result<FocusApp, sqlx::Error> {
        let query = format!(
            "INSERT INTO focus_apps (user_id, name, category)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FocusApp>(&query)
            .bind(user_id)
            .bind(name)
            .bind(category.as_str())
            .fetch_one(pool)
            .await
    }

    /// The user's entries, alphabetically.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<FocusApp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM focus_apps WHERE user_id = $1 ORDER BY name");
        sqlx::query_as::<_, FocusApp>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM focus_apps WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
