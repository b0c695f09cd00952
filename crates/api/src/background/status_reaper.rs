//! Pauses timers whose clients stopped sending heartbeats.
//!
//! A closed laptop lid or a crashed tab leaves `user_status.is_active` set
//! with nobody ticking. Each sweep finds running timers silent for longer
//! than the stale threshold, pauses them as of their last heartbeat, and
//! pushes the new status to subscribers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use slate_core::timer::Transition;
use slate_core::types::Timestamp;
use slate_db::repositories::UserStatusRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::ws::{publish_status, WsManager};

/// Run the reaper loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    ws_manager: Arc<WsManager>,
    stale_after: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        stale_secs = stale_after.as_secs(),
        interval_secs = every.as_secs(),
        "Status reaper started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Status reaper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, &ws_manager, stale_after, Utc::now()).await {
                    Ok(0) => tracing::trace!("Status reaper: nothing stale"),
                    Ok(reaped) => tracing::info!(reaped, "Status reaper: paused stale timers"),
                    Err(e) => tracing::error!(error = %e, "Status reaper: sweep failed"),
                }
            }
        }
    }
}

/// One pass. Returns how many timers were paused.
///
/// Candidates are re-checked under the row lock, so a heartbeat that lands
/// between the scan and the transition keeps its timer running.
pub async fn sweep(
    pool: &PgPool,
    ws_manager: &WsManager,
    stale_after: Duration,
    now: Timestamp,
) -> Result<usize, sqlx::Error> {
    let cutoff = now - chrono::Duration::seconds(stale_after.as_secs() as i64);
    let candidates = UserStatusRepo::find_stale(pool, cutoff).await?;

    let mut reaped = 0;
    for user_id in candidates {
        let (status, transition) = UserStatusRepo::transition(pool, user_id, |state| {
            if state.is_stale(now, stale_after) {
                state.reap()
            } else {
                Transition::Unchanged
            }
        })
        .await?;

        if transition == Transition::Reaped {
            reaped += 1;
            tracing::info!(user_id, accumulated_secs = status.accumulated_secs, "Timer reaped");
            publish_status(pool, ws_manager, &status.view(now)).await;
        }
    }
    Ok(reaped)
}
