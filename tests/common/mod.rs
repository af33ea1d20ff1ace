//! Common test utilities for E2E tests
//!
//! Spins up a fake Mastodon instance that serves the follow request
//! endpoints from an in-memory list.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use resortdesk::config;
use resortdesk::data::Account;
use tokio::net::TcpListener;

pub const ACCESS_TOKEN: &str = "test-token";
pub const USER_AGENT: &str = "ResortDesk/e2e";

/// Requests observed by the fake instance
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Default)]
struct Instance {
    pending: Vec<Account>,
    seen: Vec<SeenRequest>,
    /// Status forced onto every response when set
    failure: Option<StatusCode>,
}

type SharedInstance = Arc<Mutex<Instance>>;

/// Fake Mastodon instance
pub struct TestServer {
    pub addr: String,
    instance: SharedInstance,
}

impl TestServer {
    /// Start a fake instance holding `pending` follow requests
    pub async fn new(pending: Vec<Account>) -> Self {
        let instance: SharedInstance = Arc::new(Mutex::new(Instance {
            pending,
            ..Instance::default()
        }));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = build_test_router(instance.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            instance,
        }
    }

    /// Configuration pointing at this instance
    pub fn config(&self) -> config::AppConfig {
        config::AppConfig {
            account: config::AccountConfig {
                base_url: self.addr.clone(),
                access_token: ACCESS_TOKEN.to_string(),
            },
            http: config::HttpConfig {
                user_agent: USER_AGENT.to_string(),
                timeout_seconds: 10,
                proxy: None,
            },
            logging: config::LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    /// Make every following request answer with `status`
    pub fn fail_with(&self, status: StatusCode) {
        self.instance.lock().unwrap().failure = Some(status);
    }

    /// Add a follow request on the server side only
    pub fn push_pending(&self, account: Account) {
        self.instance.lock().unwrap().pending.push(account);
    }

    pub fn pending(&self) -> Vec<Account> {
        self.instance.lock().unwrap().pending.clone()
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.instance.lock().unwrap().seen.clone()
    }
}

/// Build router for testing
fn build_test_router(instance: SharedInstance) -> Router {
    Router::new()
        .route("/api/v1/follow_requests", get(get_follow_requests))
        .route(
            "/api/v1/follow_requests/:id/authorize",
            post(authorize_follow_request),
        )
        .route(
            "/api/v1/follow_requests/:id/reject",
            post(reject_follow_request),
        )
        .with_state(instance)
}

/// Record the request and decide whether it may proceed
fn admit(
    instance: &SharedInstance,
    method: &str,
    path: String,
    headers: &HeaderMap,
) -> Result<(), Response> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let mut instance = instance.lock().unwrap();
    instance.seen.push(SeenRequest {
        method: method.to_string(),
        path,
        authorization: header("authorization"),
        user_agent: header("user-agent"),
    });

    if let Some(status) = instance.failure {
        return Err((status, Json(serde_json::json!({ "error": "forced failure" }))).into_response());
    }

    if header("authorization").as_deref() != Some(format!("Bearer {}", ACCESS_TOKEN).as_str()) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "The access token is invalid" })),
        )
            .into_response());
    }

    Ok(())
}

/// GET /api/v1/follow_requests
async fn get_follow_requests(
    State(instance): State<SharedInstance>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = admit(
        &instance,
        "GET",
        "/api/v1/follow_requests".to_string(),
        &headers,
    ) {
        return response;
    }

    let pending = instance.lock().unwrap().pending.clone();
    Json(pending).into_response()
}

/// POST /api/v1/follow_requests/:id/authorize
async fn authorize_follow_request(
    State(instance): State<SharedInstance>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    resolve(&instance, id, "authorize", &headers, true)
}

/// POST /api/v1/follow_requests/:id/reject
async fn reject_follow_request(
    State(instance): State<SharedInstance>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    resolve(&instance, id, "reject", &headers, false)
}

fn resolve(
    instance: &SharedInstance,
    id: String,
    action: &str,
    headers: &HeaderMap,
    followed_by: bool,
) -> Response {
    let path = format!("/api/v1/follow_requests/{}/{}", id, action);
    if let Err(response) = admit(instance, "POST", path, headers) {
        return response;
    }

    let mut instance = instance.lock().unwrap();
    let Some(index) = instance.pending.iter().position(|account| account.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Record not found" })),
        )
            .into_response();
    };
    instance.pending.remove(index);

    Json(serde_json::json!({
        "id": id,
        "following": false,
        "followed_by": followed_by,
        "blocking": false,
        "muting": false,
        "requested": false,
    }))
    .into_response()
}

/// Account as served by a Pleroma instance
pub fn account(id: &str, username: &str) -> Account {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "username": username,
        "acct": format!("{}@pleroma.io", username),
        "display_name": username,
        "locked": false,
        "created_at": "2019-03-26T21:30:32",
        "followers_count": 10,
        "following_count": 10,
        "statuses_count": 100,
        "note": "engineer",
        "url": "https://pleroma.io",
        "avatar": "",
        "avatar_static": "",
        "header": "",
        "header_static": "",
        "emojis": [],
        "moved": null,
        "fields": null,
        "bot": false
    }))
    .unwrap()
}
