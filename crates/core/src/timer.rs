//! Focus-timer state machine.
//!
//! The server is the single owner of a user's elapsed counter. Clients start,
//! pause, and stop the timer and send heartbeats while it runs; the companion
//! focus tracker can force a pause (an *external stop*), and the status reaper
//! pauses timers whose heartbeats have gone quiet.
//!
//! ```text
//!            start                      pause / external_stop / reap
//!   Idle ───────────────▶ Running ─────────────────────────────────▶ Paused
//!    ▲                     │  ▲                                        │
//!    │        stop         │  └────────────────── start ───────────────┘
//!    └─────────────────────┴───────────────── stop ◀───────────────────┘
//! ```
//!
//! `accumulated_secs` holds the time banked by earlier running spans; the
//! current span is measured from `session_started_at`. All methods take `now`
//! explicitly so transitions are deterministic under test.

use std::time::Duration;

use serde::Serialize;

use crate::types::Timestamp;

/// Two stops reporting the same duration within this window are one stop.
pub const DUPLICATE_STOP_WINDOW: Duration = Duration::from_secs(2);

/// Snapshot of a user's timer as stored in `user_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub is_active: bool,
    pub accumulated_secs: i64,
    pub session_started_at: Option<Timestamp>,
    pub external_stop: bool,
    pub last_updated: Timestamp,
}

/// What a transition actually did. Handlers use this to decide whether to
/// notify subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Started,
    Paused,
    ExternallyStopped,
    Reaped,
    Heartbeat,
    Stopped { duration_secs: i64 },
    Unchanged,
}

impl Transition {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged | Self::Heartbeat)
    }
}

fn whole_secs_between(from: Timestamp, to: Timestamp) -> i64 {
    (to - from).num_seconds().max(0)
}

impl TimerState {
    /// A fresh, stopped timer.
    pub fn idle(now: Timestamp) -> Self {
        Self {
            is_active: false,
            accumulated_secs: 0,
            session_started_at: None,
            external_stop: false,
            last_updated: now,
        }
    }

    /// Elapsed seconds as of `now`, including the running span.
    pub fn current_secs(&self, now: Timestamp) -> i64 {
        match (self.is_active, self.session_started_at) {
            (true, Some(started)) => self.accumulated_secs + whole_secs_between(started, now),
            _ => self.accumulated_secs,
        }
    }

    /// Bank the running span up to `until` and go inactive.
    fn bank(&mut self, until: Timestamp) {
        self.accumulated_secs = self.current_secs(until);
        self.is_active = false;
        self.session_started_at = None;
    }

    /// Start or resume counting. Starting always clears an external stop.
    pub fn start(&mut self, now: Timestamp) -> Transition {
        let cleared = std::mem::replace(&mut self.external_stop, false);
        if self.is_active {
            if cleared {
                self.last_updated = now;
                return Transition::Started;
            }
            return Transition::Unchanged;
        }
        self.is_active = true;
        self.session_started_at = Some(now);
        self.last_updated = now;
        Transition::Started
    }

    /// User-initiated pause.
    pub fn pause(&mut self, now: Timestamp) -> Transition {
        if !self.is_active {
            return Transition::Unchanged;
        }
        self.bank(now);
        self.last_updated = now;
        Transition::Paused
    }

    /// Pause requested by the companion tracker. The flag stays set until the
    /// next [`start`](Self::start), even if the timer was already paused.
    pub fn external_stop(&mut self, now: Timestamp) -> Transition {
        if !self.is_active && self.external_stop {
            return Transition::Unchanged;
        }
        self.bank(now);
        self.external_stop = true;
        self.last_updated = now;
        Transition::ExternallyStopped
    }

    /// Liveness signal from a running client. Rejected (returns
    /// [`Transition::Unchanged`]) when the timer is not running, which tells
    /// the client it was paused elsewhere.
    pub fn heartbeat(&mut self, now: Timestamp) -> Transition {
        if !self.is_active {
            return Transition::Unchanged;
        }
        self.last_updated = now;
        Transition::Heartbeat
    }

    /// Whether a running timer has gone `max_silence` without a heartbeat.
    pub fn is_stale(&self, now: Timestamp, max_silence: Duration) -> bool {
        self.is_active && whole_secs_between(self.last_updated, now) as u64 >= max_silence.as_secs()
    }

    /// Pause a stale timer, counting only up to its last heartbeat.
    pub fn reap(&mut self) -> Transition {
        if !self.is_active {
            return Transition::Unchanged;
        }
        let last_seen = self.last_updated;
        self.bank(last_seen);
        Transition::Reaped
    }

    /// End the session and reset to idle. Returns the session length.
    pub fn stop(&mut self, now: Timestamp) -> Transition {
        let duration_secs = self.current_secs(now);
        let external_stop = self.external_stop;
        *self = Self::idle(now);
        self.external_stop = external_stop;
        Transition::Stopped { duration_secs }
    }
}

/// Decide whether a stop should be persisted as a focus session.
///
/// `last` is the duration and record time of the user's most recent session.
/// Zero-length sessions are never recorded, and a repeat of the same duration
/// inside [`DUPLICATE_STOP_WINDOW`] is treated as a double submit.
pub fn should_record_session(
    duration_secs: i64,
    last: Option<(i64, Timestamp)>,
    now: Timestamp,
) -> bool {
    if duration_secs <= 0 {
        return false;
    }
    match last {
        Some((last_duration, recorded_at)) => {
            let since = (now - recorded_at).num_milliseconds();
            !(last_duration == duration_secs
                && (0..DUPLICATE_STOP_WINDOW.as_millis() as i64).contains(&since))
        }
        None => true,
    }
}
