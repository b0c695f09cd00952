//! Repository for the `events` table (calendar entries).

use sqlx::PgPool;
use slate_core::types::{DbId, Day};

use crate::models::event::{CreateEvent, Event};

const COLUMNS: &str = "id, user_id, title, event_date, color, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (user_id, title, event_date, color)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.event_date)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Events in `[from, to]` (either bound optional), earliest first.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        from: Option<Day>,
        to: Option<Day>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE user_id = $1
               AND ($2::DATE IS NULL OR event_date >= $2)
               AND ($3::DATE IS NULL OR event_date <= $3)
             ORDER BY event_date ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
