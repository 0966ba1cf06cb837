/// Common test utilities and fixtures
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use roster_core::{NewUser, Result, RosterError, User, UserChanges, UserId, UserService};
use roster_server::{create_router, AppState};
use roster_storage::MemoryUserService;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

/// Router backed by an in-memory store
pub fn create_test_app() -> (Router, Arc<MemoryUserService>) {
    let users = Arc::new(MemoryUserService::new());
    let app = create_router(AppState::new(users.clone()));
    (app, users)
}

/// Router whose store fails every call with the error built by `make_error`
pub fn create_failing_app(make_error: fn() -> RosterError) -> Router {
    create_router(AppState::new(Arc::new(FailingUserService { make_error })))
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).unwrap()).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, body)
}

pub fn timeout_error() -> RosterError {
    RosterError::timeout("get user", Duration::from_secs(15))
}

pub fn unavailable_error() -> RosterError {
    RosterError::unavailable("connection refused")
}

pub fn storage_error() -> RosterError {
    RosterError::storage("relation \"users\" does not exist")
}

struct FailingUserService {
    make_error: fn() -> RosterError,
}

#[async_trait]
impl UserService for FailingUserService {
    async fn get(&self, _id: &UserId) -> Result<User> {
        Err((self.make_error)())
    }

    async fn delete(&self, _id: &UserId) -> Result<()> {
        Err((self.make_error)())
    }

    async fn delete_all(&self) -> Result<u64> {
        Err((self.make_error)())
    }

    async fn update(&self, _id: &UserId, _changes: UserChanges) -> Result<User> {
        Err((self.make_error)())
    }

    async fn create(&self, _new_user: NewUser) -> Result<User> {
        Err((self.make_error)())
    }
}

/// Test payloads
pub mod fixtures {
    pub const TEST_NAME: &str = "Suzy";
    pub const TEST_OCCUPATION: &str = "Worker";

    pub fn new_user_body() -> serde_json::Value {
        serde_json::json!({ "name": TEST_NAME, "occupation": TEST_OCCUPATION })
    }
}
