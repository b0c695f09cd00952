//! HTTP tests for study parties: membership rules and the shared views.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, patch_json_auth, post_auth, post_json_auth, token_for,
    user_id,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_party(app: axum::Router, token: &str, name: &str) -> i64 {
    let response = post_json_auth(app, "/api/v1/parties", json!({ "name": name }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Make sure the user behind `sub` exists, then invite them by email.
async fn invite(app: axum::Router, party_id: i64, inviter: &str, sub: &str) -> StatusCode {
    user_id(app.clone(), &token_for(sub)).await;
    post_json_auth(
        app,
        &format!("/api/v1/parties/{party_id}/members"),
        json!({ "identifier": format!("  {}@EXAMPLE.com ", sub) }),
        inviter,
    )
    .await
    .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_is_first_member(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");

    let response = post_json_auth(app.clone(), "/api/v1/parties", json!({ "name": "Night owls" }), &owner).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Night owls");
    assert_eq!(json["data"]["members"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["members"][0]["email"], "owner@example.com");

    let list = body_json(get_auth(app, "/api/v1/parties", &owner).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invite_by_username_and_reject_unknown_or_duplicate(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let party_id = create_party(app.clone(), &owner, "Study group").await;
    let members_uri = format!("/api/v1/parties/{party_id}/members");

    let buddy = token_for("buddy");
    patch_json_auth(app.clone(), "/api/v1/me", json!({ "username": "buddy_01" }), &buddy).await;

    let added = post_json_auth(app.clone(), &members_uri, json!({ "identifier": "Buddy_01" }), &owner).await;
    assert_eq!(added.status(), StatusCode::CREATED);
    assert_eq!(body_json(added).await["data"]["username"], "buddy_01");

    let duplicate = post_json_auth(app.clone(), &members_uri, json!({ "identifier": "buddy_01" }), &owner).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(duplicate).await["error"], "This user is already in the party");

    let unknown = post_json_auth(app, &members_uri, json!({ "identifier": "ghost@example.com" }), &owner).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(unknown).await["error"],
        "User not found. They need to sign up first."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn eleventh_member_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let party_id = create_party(app.clone(), &owner, "Full house").await;

    for n in 1..10 {
        let status = invite(app.clone(), party_id, &owner, &format!("member{n}")).await;
        assert_eq!(status, StatusCode::CREATED, "member {n} should fit");
    }

    let status = invite(app, party_id, &owner, "member10").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_creator_modifies_and_outsiders_see_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let member = token_for("member");
    let outsider = token_for("outsider");
    let party_id = create_party(app.clone(), &owner, "Crew").await;
    invite(app.clone(), party_id, &owner, "member").await;
    let uri = format!("/api/v1/parties/{party_id}");

    let forbidden = patch_json_auth(app.clone(), &uri, json!({ "name": "Mine now" }), &member).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete_auth(app.clone(), &uri, &member).await.status(), StatusCode::FORBIDDEN);

    user_id(app.clone(), &outsider).await;
    assert_eq!(
        patch_json_auth(app.clone(), &uri, json!({ "name": "x" }), &outsider).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get_auth(app.clone(), &format!("{uri}/stats"), &outsider).await.status(),
        StatusCode::NOT_FOUND
    );

    let renamed = patch_json_auth(app, &uri, json!({ "name": "Crew 2" }), &owner).await;
    assert_eq!(renamed.status(), StatusCode::OK);
    assert_eq!(body_json(renamed).await["data"]["name"], "Crew 2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_removal_rules(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let a = token_for("a_member");
    let party_id = create_party(app.clone(), &owner, "Crew").await;
    invite(app.clone(), party_id, &owner, "a_member").await;
    invite(app.clone(), party_id, &owner, "b_member").await;

    let owner_id = user_id(app.clone(), &owner).await;
    let a_id = user_id(app.clone(), &a).await;
    let b_id = user_id(app.clone(), &token_for("b_member")).await;
    let member_uri = |id: i64| format!("/api/v1/parties/{party_id}/members/{id}");

    // A plain member cannot remove someone else, nor can the creator remove themself.
    assert_eq!(delete_auth(app.clone(), &member_uri(b_id), &a).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete_auth(app.clone(), &member_uri(owner_id), &owner).await.status(), StatusCode::BAD_REQUEST);

    assert_eq!(delete_auth(app.clone(), &member_uri(b_id), &owner).await.status(), StatusCode::OK);
    assert_eq!(delete_auth(app.clone(), &member_uri(a_id), &a).await.status(), StatusCode::OK);

    let party = body_json(get_auth(app, "/api/v1/parties", &owner).await).await;
    assert_eq!(party["data"][0]["members"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_leaving_deletes_party(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let member = token_for("member");
    let party_id = create_party(app.clone(), &owner, "Crew").await;
    invite(app.clone(), party_id, &owner, "member").await;

    let left = body_json(post_auth(app.clone(), &format!("/api/v1/parties/{party_id}/leave"), &owner).await).await;
    assert_eq!(left["data"]["left"], true);
    assert_eq!(left["data"]["party_deleted"], true);

    let list = body_json(get_auth(app, "/api/v1/parties", &member).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_rank_members_and_daily_has_series(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = token_for("owner");
    let member = token_for("member");
    let party_id = create_party(app.clone(), &owner, "Crew").await;
    invite(app.clone(), party_id, &owner, "member").await;
    patch_json_auth(app.clone(), "/api/v1/me", json!({ "username": "member_m" }), &member).await;

    for (token, secs) in [(&owner, 600), (&member, 3000)] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/focus-sessions",
            json!({ "duration_secs": secs }),
            token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let stats = body_json(get_auth(app.clone(), &format!("/api/v1/parties/{party_id}/stats"), &owner).await).await;
    let rows = stats["data"].as_array().unwrap();
    assert_eq!(rows[0]["label"], "member_m");
    assert_eq!(rows[0]["minutes"], 50);
    assert_eq!(rows[1]["label"], "owner@example.com");
    assert_eq!(rows[1]["minutes"], 10);

    let daily = body_json(get_auth(app.clone(), &format!("/api/v1/parties/{party_id}/daily?days=3"), &owner).await).await;
    assert_eq!(daily["data"]["labels"].as_array().unwrap().len(), 3);
    let series = daily["data"]["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["data"], json!([0, 0, 10]));

    let statuses = body_json(get_auth(app, &format!("/api/v1/parties/{party_id}/statuses"), &member).await).await;
    let statuses = statuses["data"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s["is_active"] == false && s["current_seconds"] == 0));
}
