//! Server-to-client messages.

use axum::extract::ws::Message;
use serde::Serialize;
use slate_db::models::user_status::StatusView;
use slate_db::repositories::PartyRepo;
use sqlx::PgPool;

use crate::ws::manager::WsManager;

/// Frames pushed to clients, serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    StatusChanged(&'a StatusView),
}

impl ServerMessage<'_> {
    pub fn to_message(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(text) => Some(Message::Text(text.into())),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize WebSocket message");
                None
            }
        }
    }
}

/// Push a `status_changed` frame to the user and everyone who shares a party
/// with them, so party views update live.
pub async fn publish_status(pool: &PgPool, ws_manager: &WsManager, view: &StatusView) {
    let Some(message) = ServerMessage::StatusChanged(view).to_message() else {
        return;
    };

    let mut recipients = match PartyRepo::co_member_ids(pool, view.user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(user_id = view.user_id, error = %e, "Could not load party members for status push");
            Vec::new()
        }
    };
    recipients.push(view.user_id);

    let mut delivered = 0;
    for user_id in recipients {
        delivered += ws_manager.send_to_user(user_id, message.clone()).await;
    }
    tracing::debug!(user_id = view.user_id, delivered, "Published status change");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn status_changed_envelope() {
        let view = StatusView {
            user_id: 5,
            is_active: true,
            current_seconds: 42,
            accumulated_secs: 0,
            session_started_at: None,
            external_stop: false,
            last_updated: Utc.timestamp_opt(0, 0).unwrap(),
        };
        let json = serde_json::to_value(ServerMessage::StatusChanged(&view)).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["data"]["user_id"], 5);
        assert_eq!(json["data"]["current_seconds"], 42);
    }
}
