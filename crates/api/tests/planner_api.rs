//! HTTP tests for the profile and planner endpoints: subjects, tasks, events,
//! and daily todos.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, patch_json_auth, post_auth, post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_subject(app: axum::Router, token: &str, name: &str) -> i64 {
    let response = post_json_auth(app, "/api/v1/subjects", json!({ "name": name }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_task(app: axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/tasks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_is_created_on_first_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");

    let json = body_json(get_auth(app, "/api/v1/me", &token).await).await;
    assert_eq!(json["data"]["external_id"], "alice");
    assert_eq!(json["data"]["email"], "alice@example.com");
    assert_eq!(json["data"]["timezone"], "UTC");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_profile_validates_and_rejects_taken_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = token_for("alice");
    let bob = token_for("bob");

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/me",
        json!({ "username": "Alice_1", "timezone": "Europe/Berlin" }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "alice_1");
    assert_eq!(json["data"]["timezone"], "Europe/Berlin");

    let taken =
        patch_json_auth(app.clone(), "/api/v1/me", json!({ "username": "alice_1" }), &bob).await;
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let bad_tz =
        patch_json_auth(app, "/api/v1/me", json!({ "timezone": "Mars/Olympus" }), &bob).await;
    assert_eq!(bad_tz.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Subjects and tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_task_is_listed_under_its_subject(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    let subject_id = create_subject(app.clone(), &token, "Calculus").await;

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Problem set 3", "subject_id": subject_id, "priority": "high" }),
    )
    .await;
    assert_eq!(task["priority"], "high");
    assert_eq!(task["done"], false);

    let tasks = body_json(get_auth(app.clone(), "/api/v1/tasks", &token).await).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 1);
    assert_eq!(tasks["data"][0]["title"], "Problem set 3");

    let subjects = body_json(get_auth(app, "/api/v1/subjects", &token).await).await;
    assert_eq!(subjects["data"][0]["name"], "Calculus");
    assert_eq!(subjects["data"][0]["tasks"][0]["id"], task["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subject_name_length_is_validated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");

    let long = "x".repeat(81);
    let response = post_json_auth(app.clone(), "/api/v1/subjects", json!({ "name": long }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let blank = post_json_auth(app, "/api/v1/subjects", json!({ "name": "  " }), &token).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_subject_removes_its_tasks(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    let subject_id = create_subject(app.clone(), &token, "History").await;
    let task = create_task(app.clone(), &token, json!({ "title": "Essay", "subject_id": subject_id })).await;

    let response = delete_auth(app.clone(), &format!("/api/v1/subjects/{subject_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], true);

    let gone = get_auth(app, &format!("/api/v1/tasks/{}", task["id"]), &token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_rows_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = token_for("alice");
    let mallory = token_for("mallory");
    let subject_id = create_subject(app.clone(), &alice, "Physics").await;
    let task = create_task(app.clone(), &alice, json!({ "title": "Lab", "subject_id": subject_id })).await;
    let task_uri = format!("/api/v1/tasks/{}", task["id"]);

    assert_eq!(get_auth(app.clone(), &task_uri, &mallory).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        patch_json_auth(app.clone(), &task_uri, json!({ "done": true }), &mallory).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(delete_auth(app.clone(), &task_uri, &mallory).await.status(), StatusCode::NOT_FOUND);

    // Nor can a task be filed under someone else's subject.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/tasks",
        json!({ "title": "Sneaky", "subject_id": subject_id }),
        &mallory,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mine = body_json(get_auth(app, "/api/v1/tasks", &mallory).await).await;
    assert!(mine["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_due_date_clears_and_absent_keeps(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    let subject_id = create_subject(app.clone(), &token, "Biology").await;
    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Read ch. 4", "subject_id": subject_id, "due_date": "2026-05-01" }),
    )
    .await;
    let uri = format!("/api/v1/tasks/{}", task["id"]);

    let kept = body_json(patch_json_auth(app.clone(), &uri, json!({ "pinned": true }), &token).await).await;
    assert_eq!(kept["data"]["due_date"], "2026-05-01");
    assert_eq!(kept["data"]["pinned"], true);

    let cleared = body_json(patch_json_auth(app, &uri, json!({ "due_date": null }), &token).await).await;
    assert!(cleared["data"]["due_date"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_stats_and_due_today(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    let subject_id = create_subject(app.clone(), &token, "Chemistry").await;
    let today = chrono::Utc::now().date_naive();

    create_task(app.clone(), &token, json!({ "title": "Due now", "subject_id": subject_id, "due_date": today })).await;
    create_task(app.clone(), &token, json!({ "title": "Late", "subject_id": subject_id, "due_date": "2020-01-01" })).await;
    create_task(app.clone(), &token, json!({ "title": "Done", "subject_id": subject_id, "done": true })).await;

    let stats = body_json(get_auth(app.clone(), "/api/v1/tasks/stats", &token).await).await;
    assert_eq!(stats["data"]["total"], 3);
    assert_eq!(stats["data"]["completed"], 1);
    assert_eq!(stats["data"]["pending"], 2);
    assert_eq!(stats["data"]["overdue"], 1);

    let due = body_json(get_auth(app, "/api/v1/tasks/due-today", &token).await).await;
    let due = due["data"].as_array().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["title"], "Due now");
    assert_eq!(due[0]["subject_name"], "Chemistry");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tasks_sort_by_priority(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    let subject_id = create_subject(app.clone(), &token, "Art").await;
    for (title, priority) in [("low", "low"), ("high", "high"), ("medium", "medium")] {
        create_task(app.clone(), &token, json!({ "title": title, "subject_id": subject_id, "priority": priority })).await;
    }

    let json = body_json(get_auth(app, "/api/v1/tasks?sort=priority", &token).await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["high", "medium", "low"]);
}

// ---------------------------------------------------------------------------
// Events and daily todos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn events_filter_by_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");
    for date in ["2026-03-01", "2026-03-15", "2026-04-01"] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/events",
            json!({ "title": "Exam", "event_date": date, "color": "#f00" }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        get_auth(app.clone(), "/api/v1/events?from=2026-03-10&to=2026-03-31", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["event_date"], "2026-03-15");

    let inverted = get_auth(app, "/api/v1/events?from=2026-04-01&to=2026-03-01", &token).await;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_todo_toggle_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = token_for("alice");

    let response = post_json_auth(app.clone(), "/api/v1/daily-todos", json!({ "title": "Flashcards" }), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let toggled = body_json(post_auth(app.clone(), &format!("/api/v1/daily-todos/{id}/toggle"), &token).await).await;
    assert_eq!(toggled["data"]["done"], true);

    let list = body_json(get_auth(app.clone(), "/api/v1/daily-todos", &token).await).await;
    assert_eq!(list["data"][0]["done"], true);

    let deleted = delete_auth(app.clone(), &format!("/api/v1/daily-todos/{id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let again = post_auth(app, &format!("/api/v1/daily-todos/{id}/toggle"), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
