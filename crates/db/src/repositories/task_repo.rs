//! Repository for the `tasks` table.

use sqlx::PgPool;
use slate_core::planner::Priority;
use slate_core::types::{DbId, Day};

use crate::models::task::{CreateTask, DueTodayTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, subject_id, title, priority, done, due_date, pinned, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task under one of the user's subjects.
    ///
    /// Returns `None` when `subject_id` does not belong to `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, subject_id, title, priority, done, due_date, pinned)
             SELECT $1, s.id, $3, $4, COALESCE($5, false), $6, COALESCE($7, false)
             FROM subjects s
             WHERE s.id = $2 AND s.user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(input.subject_id)
            .bind(&input.title)
            .bind(input.priority.unwrap_or_default().as_str())
            .bind(input.done)
            .bind(input.due_date)
            .bind(input.pinned)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, user_id: DbId, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's tasks, newest first, optionally limited to one subject.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        subject_id: Option<DbId>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1 AND ($2::BIGINT IS NULL OR subject_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Tasks belonging to any of `subject_ids`, newest first. Callers pass
    /// ids they have already scoped to the user.
    pub async fn list_for_subjects(
        pool: &PgPool,
        subject_ids: &[DbId],
    ) -> Result<Vec<Task>, sqlx::Error> {
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE subject_id = ANY($1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(subject_ids)
            .fetch_all(pool)
            .await
    }

    /// Patch a task. Moving it to another subject requires the user to own
    /// that subject; otherwise nothing is updated and `None` is returned.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let due_date_provided = input.due_date.is_some();
        let due_date_value = input.due_date.flatten();

        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                subject_id = COALESCE($4, subject_id),
                priority = COALESCE($5, priority),
                done = COALESCE($6, done),
                due_date = CASE WHEN $7 THEN $8 ELSE due_date END,
                pinned = COALESCE($9, pinned)
             WHERE id = $1 AND user_id = $2
               AND ($4::BIGINT IS NULL
                    OR EXISTS (SELECT 1 FROM subjects s WHERE s.id = $4 AND s.user_id = $2))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.subject_id)
            .bind(input.priority.map(Priority::as_str))
            .bind(input.done)
            .bind(due_date_provided)
            .bind(due_date_value)
            .bind(input.pinned)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `(done, due_date)` for every task the user has, for the counters.
    pub async fn completion_pairs(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<(bool, Option<Day>)>, sqlx::Error> {
        sqlx::query_as("SELECT done, due_date FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Open tasks due on `day`, with their subject's name and color.
    pub async fn list_due_on(
        pool: &PgPool,
        user_id: DbId,
        day: Day,
    ) -> Result<Vec<DueTodayTask>, sqlx::Error> {
        sqlx::query_as::<_, DueTodayTask>(
            "SELECT t.id, t.subject_id, t.title, t.priority, t.due_date, t.pinned,
                    s.name AS subject_name, s.color AS subject_color
             FROM tasks t
             JOIN subjects s ON s.id = t.subject_id
             WHERE t.user_id = $1 AND NOT t.done AND t.due_date = $2
             ORDER BY t.pinned DESC, t.created_at DESC",
        )
        .bind(user_id)
        .bind(day)
        .fetch_all(pool)
        .await
    }
}
