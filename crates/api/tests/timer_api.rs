//! HTTP tests for the server-owned timer and the stale-timer reaper.
//!
//! Elapsed time is simulated by moving `user_status` timestamps backwards in
//! the database rather than sleeping.

mod common;

use std::time::Duration;

use axum::extract::ws::Message;
use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get_auth, post_auth, post_json_auth, token_for, user_id};
use serde_json::{json, Value};
use slate_api::background::status_reaper;
use slate_api::ws::WsManager;
use sqlx::PgPool;
use tokio::sync::mpsc::UnboundedReceiver;

async fn rewind_session(pool: &PgPool, user_id: i64, secs: i64) {
    sqlx::query(
        "UPDATE user_status
         SET session_started_at = session_started_at - make_interval(secs => $2),
             last_updated = last_updated - make_interval(secs => $2)
         WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(secs as f64)
    .execute(pool)
    .await
    .unwrap();
}

/// Every frame queued so far, parsed as JSON.
fn drain_frames(rx: &mut UnboundedReceiver<Message>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let Message::Text(text) = message {
            frames.push(serde_json::from_str(text.as_str()).unwrap());
        }
    }
    frames
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn timer_starts_idle(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");

    let json = body_json(get_auth(app, "/api/v1/timer", &token).await).await;
    assert_eq!(json["data"]["is_active"], false);
    assert_eq!(json["data"]["current_seconds"], 0);
    assert_eq!(json["data"]["external_stop"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_pause_start_stop_records_accumulated_time(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = token_for("alice");
    let uid = user_id(app.clone(), &token).await;

    post_auth(app.clone(), "/api/v1/timer/start", &token).await;
    rewind_session(&pool, uid, 90).await;
    let paused = body_json(post_auth(app.clone(), "/api/v1/timer/pause", &token).await).await;
    let first = paused["data"]["accumulated_secs"].as_i64().unwrap();
    assert!((90..=91).contains(&first), "first span was {first}");
    assert_eq!(paused["data"]["is_active"], false);

    let started = body_json(post_auth(app.clone(), "/api/v1/timer/start", &token).await).await;
    assert_eq!(started["data"]["is_active"], true);
    rewind_session(&pool, uid, 30).await;

    let stopped = body_json(post_auth(app.clone(), "/api/v1/timer/stop", &token).await).await;
    let duration = stopped["data"]["session"]["duration_secs"].as_i64().unwrap();
    assert!((first + 30..=first + 31).contains(&duration), "session was {duration}");
    assert_eq!(stopped["data"]["status"]["is_active"], false);
    assert_eq!(stopped["data"]["status"]["current_seconds"], 0);

    // Nothing left to record on a second stop.
    let again = body_json(post_auth(app.clone(), "/api/v1/timer/stop", &token).await).await;
    assert!(again["data"]["session"].is_null());

    let sessions = body_json(get_auth(app, "/api/v1/focus-sessions", &token).await).await;
    assert_eq!(sessions["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn external_stop_blocks_heartbeat_until_start(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");

    post_auth(app.clone(), "/api/v1/timer/start", &token).await;
    assert_eq!(
        post_auth(app.clone(), "/api/v1/timer/heartbeat", &token).await.status(),
        StatusCode::OK
    );

    let stopped = body_json(post_auth(app.clone(), "/api/v1/timer/external-stop", &token).await).await;
    assert_eq!(stopped["data"]["external_stop"], true);
    assert_eq!(stopped["data"]["is_active"], false);

    let rejected = post_auth(app.clone(), "/api/v1/timer/heartbeat", &token).await;
    assert_eq!(rejected.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(rejected).await["error"], "Timer is not running");

    let resumed = body_json(post_auth(app.clone(), "/api/v1/timer/start", &token).await).await;
    assert_eq!(resumed["data"]["external_stop"], false);
    assert_eq!(
        post_auth(app, "/api/v1/timer/heartbeat", &token).await.status(),
        StatusCode::OK
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reaper_pauses_silent_timers_at_last_heartbeat(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let quiet = token_for("quiet");
    let lively = token_for("lively");
    let quiet_id = user_id(app.clone(), &quiet).await;
    user_id(app.clone(), &lively).await;

    post_auth(app.clone(), "/api/v1/timer/start", &quiet).await;
    post_auth(app.clone(), "/api/v1/timer/start", &lively).await;

    // Started 150 s ago, last heartbeat 120 s ago.
    sqlx::query(
        "UPDATE user_status
         SET session_started_at = now() - interval '150 seconds',
             last_updated = now() - interval '120 seconds'
         WHERE user_id = $1",
    )
    .bind(quiet_id)
    .execute(&pool)
    .await
    .unwrap();

    let ws_manager = WsManager::new();
    let reaped = status_reaper::sweep(&pool, &ws_manager, Duration::from_secs(60), Utc::now())
        .await
        .unwrap();
    assert_eq!(reaped, 1);

    let quiet_status = body_json(get_auth(app.clone(), "/api/v1/timer", &quiet).await).await;
    assert_eq!(quiet_status["data"]["is_active"], false);
    assert_eq!(quiet_status["data"]["accumulated_secs"], 30);

    let lively_status = body_json(get_auth(app, "/api/v1/timer", &lively).await).await;
    assert_eq!(lively_status["data"]["is_active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_change_reaches_user_and_party_members_only(pool: PgPool) {
    let state = common::test_state(pool);
    let ws_manager = state.ws_manager.clone();
    let app = common::build_app_with_state(state);

    let runner = token_for("runner");
    let runner_id = user_id(app.clone(), &runner).await;
    let mate_id = user_id(app.clone(), &token_for("mate")).await;
    let stranger_id = user_id(app.clone(), &token_for("stranger")).await;

    let party = post_json_auth(app.clone(), "/api/v1/parties", json!({ "name": "Library" }), &runner).await;
    let party_id = body_json(party).await["data"]["id"].as_i64().unwrap();
    let invited = post_json_auth(
        app.clone(),
        &format!("/api/v1/parties/{party_id}/members"),
        json!({ "identifier": "mate@example.com" }),
        &runner,
    )
    .await;
    assert_eq!(invited.status(), StatusCode::CREATED);

    let mut runner_rx = ws_manager.add("runner-conn".into(), runner_id).await;
    let mut mate_rx = ws_manager.add("mate-conn".into(), mate_id).await;
    let mut stranger_rx = ws_manager.add("stranger-conn".into(), stranger_id).await;

    let started = post_auth(app, "/api/v1/timer/start", &runner).await;
    assert_eq!(started.status(), StatusCode::OK);

    for frames in [drain_frames(&mut runner_rx), drain_frames(&mut mate_rx)] {
        assert_eq!(frames.len(), 1, "expected one frame, got {frames:?}");
        assert_eq!(frames[0]["type"], "status_changed");
        assert_eq!(frames[0]["data"]["user_id"], runner_id);
        assert_eq!(frames[0]["data"]["is_active"], true);
    }
    assert!(drain_frames(&mut stranger_rx).is_empty());
}
