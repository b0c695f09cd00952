//! Repository for the `subjects` table.

use std::collections::HashMap;

use sqlx::PgPool;
use slate_core::types::DbId;

use crate::models::subject::{Subject, SubjectWithTasks, UpdateSubject};
use crate::repositories::TaskRepo;

const COLUMNS: &str = "id, user_id, name, color, expanded, created_at, updated_at";

pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
        color: &str,
    ) -> Result<Subject, sqlx::Error> {
        let query = format!(
            "INSERT INTO subjects (user_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(user_id)
            .bind(name)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's subjects, oldest first.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subjects WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's subjects, each with its tasks (newest task first).
    pub async fn list_with_tasks(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SubjectWithTasks>, sqlx::Error> {
        let subjects = Self::list(pool, user_id).await?;
        let ids: Vec<DbId> = subjects.iter().map(|s| s.id).collect();
        let mut by_subject: HashMap<DbId, Vec<_>> = HashMap::new();
        for task in TaskRepo::list_for_subjects(pool, &ids).await? {
            by_subject.entry(task.subject_id).or_default().push(task);
        }
        Ok(subjects
            .into_iter()
            .map(|subject| SubjectWithTasks {
                tasks: by_subject.remove(&subject.id).unwrap_or_default(),
                subject,
            })
            .collect())
    }

    /// A single subject with its tasks.
    pub async fn find_with_tasks(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<SubjectWithTasks>, sqlx::Error> {
        match Self::find(pool, user_id, id).await? {
            Some(subject) => {
                let tasks = TaskRepo::list_for_subjects(pool, &[subject.id]).await?;
                Ok(Some(SubjectWithTasks { subject, tasks }))
            }
            None => Ok(None),
        }
    }

    /// Update a subject. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the user owns no subject with the given `id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET
                name = COALESCE($3, name),
                color = COALESCE($4, color),
                expanded = COALESCE($5, expanded)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.color)
            .bind(input.expanded)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subject and, by cascade, its tasks. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
