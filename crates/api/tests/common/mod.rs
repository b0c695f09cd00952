#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use slate_api::auth::jwt::{issue_token, JwtConfig};
use slate_api::config::ServerConfig;
use slate_api::router::build_app_router;
use slate_api::state::AppState;
use slate_api::tracker::TrackerSupervisor;
use slate_api::ws::WsManager;

pub const TEST_SECRET: &str = "integration-test-secret-long-enough-for-hs256";

/// A `ServerConfig` with local-development defaults and no focus tracker.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            audience: None,
        },
        status_stale_secs: 60,
        status_reap_interval_secs: 15,
        focus_tracker_cmd: None,
        public_api_url: "http://localhost:3000".to_string(),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    let config = test_config();
    AppState {
        pool,
        tracker: Arc::new(TrackerSupervisor::new(
            config.focus_tracker_cmd.clone(),
            config.public_api_url.clone(),
        )),
        config: Arc::new(config),
        ws_manager: Arc::new(WsManager::new()),
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_state(test_state(pool))
}

/// Same as [`build_test_app`], for tests that need a handle on the state
/// (e.g. to register WebSocket receivers).
pub fn build_app_with_state(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// A valid bearer token for identity-provider subject `sub`.
pub fn token_for(sub: &str) -> String {
    let email = format!("{sub}@example.com");
    issue_token(sub, Some(&email), 3600, &test_config().jwt).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `id` of the user behind `token`, creating the row if needed.
pub async fn user_id(app: Router, token: &str) -> i64 {
    let json = body_json(get_auth(app, "/api/v1/me", token).await).await;
    json["data"]["id"].as_i64().unwrap()
}
