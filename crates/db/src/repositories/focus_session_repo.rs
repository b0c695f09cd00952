//! Repository for the `focus_sessions` table.

use sqlx::{PgPool, Postgres, Transaction};
use slate_core::types::{DbId, Day, Timestamp};

use crate::models::focus_session::FocusSession;

const COLUMNS: &str = "id, user_id, session_date, duration_secs, recorded_at, created_at";

/// Provides inserts, listings, and the per-day aggregates behind analytics.
pub struct FocusSessionRepo;

impl FocusSessionRepo {
    /// Record a session.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        session_date: Day,
        duration_secs: i64,
    ) -> Result<FocusSession, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let session = Self::create_inner(&mut tx, user_id, session_date, duration_secs).await?;
        tx.commit().await?;
        Ok(session)
    }

    pub(crate) async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        session_date: Day,
        duration_secs: i64,
    ) -> Result<FocusSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO focus_sessions (user_id, session_date, duration_secs)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FocusSession>(&query)
            .bind(user_id)
            .bind(session_date)
            .bind(duration_secs)
            .fetch_one(&mut **tx)
            .await
    }

    /// Duration and record time of the user's most recent session.
    pub(crate) async fn latest_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<Option<(i64, Timestamp)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT duration_secs, recorded_at FROM focus_sessions
             WHERE user_id = $1
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// The user's sessions, most recent first.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<FocusSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM focus_sessions
             WHERE user_id = $1
             ORDER BY recorded_at DESC, id DESC"
        );
        sqlx::query_as::<_, FocusSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM focus_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Seconds per day for one user over `[start, end]`.
    pub async fn daily_totals(
        pool: &PgPool,
        user_id: DbId,
        start: Day,
        end: Day,
    ) -> Result<Vec<(Day, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT session_date, SUM(duration_secs)::BIGINT
             FROM focus_sessions
             WHERE user_id = $1 AND session_date BETWEEN $2 AND $3
             GROUP BY session_date
             ORDER BY session_date",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Seconds per user per day over `[start, end]`, for party leaderboards.
    pub async fn daily_totals_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
        start: Day,
        end: Day,
    ) -> Result<Vec<(DbId, Day, i64)>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as(
            "SELECT user_id, session_date, SUM(duration_secs)::BIGINT
             FROM focus_sessions
             WHERE user_id = ANY($1) AND session_date BETWEEN $2 AND $3
             GROUP BY user_id, session_date
             ORDER BY user_id, session_date",
        )
        .bind(user_ids)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}
