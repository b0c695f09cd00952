//! Repository for the `daily_todos` table.

use sqlx::PgPool;
use slate_core::types::{DbId, Day};

use crate::models::daily_todo::DailyTodo;

const COLUMNS: &str = "id, user_id, title, done, todo_date, created_at, updated_at";

pub struct DailyTodoRepo;

impl DailyTodoRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        title: &str,
        todo_date: Day,
    ) -> Result<DailyTodo, sqlx::Error> {
        let query = format!(
            "INSERT INTO daily_todos (user_id, title, todo_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyTodo>(&query)
            .bind(user_id)
            .bind(title)
            .bind(todo_date)
            .fetch_one(pool)
            .await
    }

    /// Todos for one day, in creation order.
    pub async fn list_for_day(
        pool: &PgPool,
        user_id: DbId,
        day: Day,
    ) -> Result<Vec<DailyTodo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_todos
             WHERE user_id = $1 AND todo_date = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, DailyTodo>(&query)
            .bind(user_id)
            .bind(day)
            .fetch_all(pool)
            .await
    }

    /// Flip `done` in a single statement so concurrent toggles cannot be lost.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<DailyTodo>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_todos SET done = NOT done
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyTodo>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM daily_todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
