//! Per-user timer / presence rows.

use serde::Serialize;
use slate_core::timer::TimerState;
use slate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_status` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserStatus {
    pub user_id: DbId,
    pub is_active: bool,
    pub accumulated_secs: i64,
    pub session_started_at: Option<Timestamp>,
    pub external_stop: bool,
    pub last_updated: Timestamp,
}

impl UserStatus {
    pub fn state(&self) -> TimerState {
        TimerState {
            is_active: self.is_active,
            accumulated_secs: self.accumulated_secs,
            session_started_at: self.session_started_at,
            external_stop: self.external_stop,
            last_updated: self.last_updated,
        }
    }

    /// The wire shape, with `current_seconds` evaluated at `now`.
    pub fn view(&self, now: Timestamp) -> StatusView {
        StatusView {
            user_id: self.user_id,
            is_active: self.is_active,
            current_seconds: self.state().current_secs(now),
            accumulated_secs: self.accumulated_secs,
            session_started_at: self.session_started_at,
            external_stop: self.external_stop,
            last_updated: self.last_updated,
        }
    }
}

/// What clients see for a timer: `GET /timer`, party statuses, and the
/// `status_changed` push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub user_id: DbId,
    pub is_active: bool,
    pub current_seconds: i64,
    pub accumulated_secs: i64,
    pub session_started_at: Option<Timestamp>,
    pub external_stop: bool,
    pub last_updated: Timestamp,
}

impl StatusView {
    /// The view for a user who has never started a timer.
    pub fn idle(user_id: DbId, now: Timestamp) -> Self {
        Self {
            user_id,
            is_active: false,
            current_seconds: 0,
            accumulated_secs: 0,
            session_started_at: None,
            external_stop: false,
            last_updated: now,
        }
    }
}
