//! Repository for `user_status`, the per-user timer.
//!
//! Every transition runs in a transaction that holds the row lock from
//! `SELECT ... FOR UPDATE` until the new state is written, so heartbeats,
//! pauses, external stops, and the reaper serialize per user.

use sqlx::{PgPool, Postgres, Transaction};
use slate_core::timer::{should_record_session, TimerState, Transition};
use slate_core::types::{DbId, Day, Timestamp};

use crate::models::focus_session::FocusSession;
use crate::models::user_status::UserStatus;
use crate::repositories::FocusSessionRepo;

const COLUMNS: &str =
    "user_id, is_active, accumulated_secs, session_started_at, external_stop, last_updated";

pub struct UserStatusRepo;

impl UserStatusRepo {
    /// The user's status row, created idle if missing.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_status (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserStatus>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Status rows for the given users. Users who never touched the timer
    /// have no row.
    pub async fn list_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<UserStatus>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM user_status WHERE user_id = ANY($1)");
        sqlx::query_as::<_, UserStatus>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }

    /// Running timers whose last heartbeat is at or before `cutoff`.
    pub async fn find_stale(pool: &PgPool, cutoff: Timestamp) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM user_status WHERE is_active AND last_updated <= $1",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Apply `apply` to the locked timer and persist the result if it
    /// changed anything.
    pub async fn transition<F>(
        pool: &PgPool,
        user_id: DbId,
        apply: F,
    ) -> Result<(UserStatus, Transition), sqlx::Error>
    where
        F: FnOnce(&mut TimerState) -> Transition,
    {
        let mut tx = pool.begin().await?;
        let current = Self::lock_inner(&mut tx, user_id).await?;
        let mut state = current.state();
        let transition = apply(&mut state);

        let status = if transition == Transition::Unchanged {
            current
        } else {
            Self::save_inner(&mut tx, user_id, &state).await?
        };

        tx.commit().await?;
        Ok((status, transition))
    }

    /// Stop the timer and, unless it is a zero-length or duplicate stop,
    /// record a focus session dated `session_date`. Both writes share one
    /// transaction.
    pub async fn stop(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
        session_date: Day,
    ) -> Result<(UserStatus, Transition, Option<FocusSession>), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut state = Self::lock_inner(&mut tx, user_id).await?.state();
        let transition = state.stop(now);

        let mut recorded = None;
        if let Transition::Stopped { duration_secs } = transition {
            let last = FocusSessionRepo::latest_inner(&mut tx, user_id).await?;
            if should_record_session(duration_secs, last, now) {
                recorded = Some(
                    FocusSessionRepo::create_inner(&mut tx, user_id, session_date, duration_secs)
                        .await?,
                );
            }
        }

        let status = Self::save_inner(&mut tx, user_id, &state).await?;
        tx.commit().await?;
        Ok((status, transition, recorded))
    }

    async fn lock_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<UserStatus, sqlx::Error> {
        sqlx::query("INSERT INTO user_status (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM user_status WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, UserStatus>(&query)
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await
    }

    async fn save_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        state: &TimerState,
    ) -> Result<UserStatus, sqlx::Error> {
        let query = format!(
            "UPDATE user_status SET
                is_active = $2,
                accumulated_secs = $3,
                session_started_at = $4,
                external_stop = $5,
                last_updated = $6
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserStatus>(&query)
            .bind(user_id)
            .bind(state.is_active)
            .bind(state.accumulated_secs)
            .bind(state.session_started_at)
            .bind(state.external_stop)
            .bind(state.last_updated)
            .fetch_one(&mut **tx)
            .await
    }
}
