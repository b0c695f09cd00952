//! Supervision of the companion focus-tracker process.
//!
//! The tracker is an external program (configured by `FOCUS_TRACKER_CMD`)
//! that watches the foreground app and calls back into the API to classify
//! it and to externally stop the timer. At most one tracker runs per server.
//! Its stdout and stderr are forwarded to tracing line by line.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use slate_core::types::{DbId, Timestamp};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, Mutex};

use crate::error::AppError;

/// `POST /focus-tracker` actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerAction {
    Start,
    Stop,
    Status,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Tracker is already running")]
    AlreadyRunning,

    #[error("Tracker is not running")]
    NotRunning,

    #[error("Focus tracker is not configured on this server")]
    NotConfigured,

    #[error("Failed to start tracker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Spawn(e) => AppError::InternalError(format!("tracker spawn failed: {e}")),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// What `status` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerStatus {
    pub is_running: bool,
    pub pid: Option<u32>,
    pub user_id: Option<DbId>,
    pub started_at: Option<Timestamp>,
}

impl TrackerStatus {
    fn stopped() -> Self {
        Self {
            is_running: false,
            pid: None,
            user_id: None,
            started_at: None,
        }
    }
}

struct TrackerProcess {
    /// Distinguishes this run from later ones so a late exit never clears a
    /// newer process.
    generation: u64,
    pid: Option<u32>,
    user_id: DbId,
    started_at: Timestamp,
    kill: oneshot::Sender<()>,
}

pub struct TrackerSupervisor {
    command: Option<String>,
    api_url: String,
    current: Arc<Mutex<Option<TrackerProcess>>>,
    generation: AtomicU64,
}

impl TrackerSupervisor {
    pub fn new(command: Option<String>, api_url: String) -> Self {
        Self {
            command,
            api_url,
            current: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }

    /// Spawn the tracker on behalf of `user_id`. `api_token` is handed to the
    /// child so its callbacks authenticate as that user.
    pub async fn start(
        &self,
        user_id: DbId,
        api_token: &str,
    ) -> Result<TrackerStatus, TrackerError> {
        let mut current = self.current.lock().await;
        if current.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let command = self.command.as_deref().ok_or(TrackerError::NotConfigured)?;
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(TrackerError::NotConfigured)?;

        let mut child = Command::new(program)
            .args(parts)
            .env("SLATE_USER_ID", user_id.to_string())
            .env("SLATE_API_URL", &self.api_url)
            .env("SLATE_API_TOKEN", api_token)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let pid = child.id();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let started_at = Utc::now();

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, "stderr"));
        }

        let (kill_tx, kill_rx) = oneshot::channel();
        tokio::spawn(watch(child, kill_rx, Arc::clone(&self.current), generation));

        tracing::info!(user_id, pid, program, "Focus tracker started");

        *current = Some(TrackerProcess {
            generation,
            pid,
            user_id,
            started_at,
            kill: kill_tx,
        });

        Ok(TrackerStatus {
            is_running: true,
            pid,
            user_id: Some(user_id),
            started_at: Some(started_at),
        })
    }

    /// Kill the running tracker.
    pub async fn stop(&self) -> Result<TrackerStatus, TrackerError> {
        let process = self
            .current
            .lock()
            .await
            .take()
            .ok_or(TrackerError::NotRunning)?;

        // The watcher may already be gone if the child exited this instant.
        let _ = process.kill.send(());
        tracing::info!(pid = process.pid, user_id = process.user_id, "Focus tracker stopped");
        Ok(TrackerStatus::stopped())
    }

    pub async fn status(&self) -> TrackerStatus {
        match &*self.current.lock().await {
            Some(p) => TrackerStatus {
                is_running: true,
                pid: p.pid,
                user_id: Some(p.user_id),
                started_at: Some(p.started_at),
            },
            None => TrackerStatus::stopped(),
        }
    }

    /// Stop the tracker if one is running. Called on server shutdown.
    pub async fn shutdown(&self) {
        if self.stop().await.is_ok() {
            tracing::info!("Focus tracker terminated during shutdown");
        }
    }
}

/// Wait for the child to exit or for a kill request, then clear the slot if
/// it still belongs to this run.
async fn watch(
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    current: Arc<Mutex<Option<TrackerProcess>>>,
    generation: u64,
) {
    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => tracing::info!(code = status.code(), "Focus tracker exited"),
            Err(e) => tracing::warn!(error = %e, "Failed to wait on focus tracker"),
        },
        _ = kill_rx => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "Failed to kill focus tracker");
            }
        }
    }

    let mut slot = current.lock().await;
    if slot.as_ref().is_some_and(|p| p.generation == generation) {
        *slot = None;
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(stream: R, stream_name: &'static str) {
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => tracing::info!(target: "focus_tracker", stream = stream_name, "{line}"),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(stream = stream_name, error = %e, "Tracker output closed");
                break;
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    fn supervisor(cmd: &str) -> TrackerSupervisor {
        TrackerSupervisor::new(Some(cmd.to_string()), "http://localhost:3000".into())
    }

    #[tokio::test]
    async fn start_stop_cycle() {
        let sup = supervisor("sleep 30");
        let started = sup.start(7, "tok").await.unwrap();
        assert!(started.is_running);
        assert!(started.pid.is_some());
        assert_eq!(sup.status().await.user_id, Some(7));

        assert_matches!(sup.start(7, "tok").await, Err(TrackerError::AlreadyRunning));

        sup.stop().await.unwrap();
        assert!(!sup.status().await.is_running);
        assert_matches!(sup.stop().await, Err(TrackerError::NotRunning));
    }

    #[tokio::test]
    async fn exited_child_is_cleared() {
        let sup = supervisor("true");
        sup.start(1, "tok").await.unwrap();
        for _ in 0..50 {
            if !sup.status().await.is_running {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("tracker slot was not cleared after the child exited");
    }

    #[tokio::test]
    async fn unconfigured_or_missing_binary() {
        let none = TrackerSupervisor::new(None, String::new());
        assert!(!none.is_configured());
        assert_matches!(none.start(1, "tok").await, Err(TrackerError::NotConfigured));

        let missing = supervisor("/definitely/not/a/real/binary");
        assert_matches!(missing.start(1, "tok").await, Err(TrackerError::Spawn(_)));
        assert!(!missing.status().await.is_running);
    }

    #[tokio::test]
    async fn child_receives_user_url_and_token() {
        let dir = std::env::temp_dir().join(format!("slate-tracker-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("dump_env.sh");
        let out = dir.join("env.txt");
        std::fs::write(
            &script,
            "printf '%s\\n%s\\n%s\\n' \"$SLATE_USER_ID\" \"$SLATE_API_URL\" \"$SLATE_API_TOKEN\" > \"$1.tmp\" && mv \"$1.tmp\" \"$1\"\n",
        )
        .unwrap();

        let sup = supervisor(&format!("sh {} {}", script.display(), out.display()));
        sup.start(42, "signed.jwt.value").await.unwrap();

        let mut written = None;
        for _ in 0..50 {
            if let Ok(text) = std::fs::read_to_string(&out) {
                written = Some(text);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let _ = std::fs::remove_dir_all(&dir);

        let written = written.expect("tracker never wrote its environment");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines, ["42", "http://localhost:3000", "signed.jwt.value"]);
    }
}
