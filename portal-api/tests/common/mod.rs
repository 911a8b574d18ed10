/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store and wraps the request
/// plumbing: JSON bodies, bearer headers and response decoding.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use portal_api::app::{build_router, AppState};
use portal_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use portal_shared::store::memory::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context holding the router and its backing store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// A registered OWNER and its session token
pub struct Owner {
    pub token: String,
    pub user_id: String,
    pub workspace_id: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and decodes the JSON body (`Null` when empty)
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        decode(response).await
    }

    /// Sends a raw string body, for malformed JSON cases
    pub async fn send_raw(&self, method: &str, uri: &str, token: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        decode(response).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send("PUT", uri, Some(token), Some(body)).await
    }

    /// Registers a workspace and returns its OWNER session
    pub async fn register(&self, email: &str, workspace_name: &str) -> Owner {
        let response = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "correct-horse",
                    "name": "Owner",
                    "workspaceName": workspace_name,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);

        Owner {
            token: response.body["token"].as_str().unwrap().to_string(),
            user_id: response.body["user"]["id"].as_str().unwrap().to_string(),
            workspace_id: response.body["user"]["workspaceId"].as_str().unwrap().to_string(),
        }
    }

    /// Adds a STAFF member and logs them in
    pub async fn staff(&self, owner: &Owner, email: &str) -> String {
        let response = self
            .post(
                "/api/workspace/members",
                &owner.token,
                json!({ "email": email, "password": "staff-secret", "name": "Staff" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "add member failed: {}", response.body);

        self.login(email, "staff-secret").await.body["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Creates a client and returns its id
    pub async fn create_client(&self, token: &str, company: &str) -> String {
        let response = self
            .post(
                "/api/clients",
                token,
                json!({ "companyName": company, "contactEmail": "contact@example.com" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create client failed: {}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Creates a project and returns its id
    pub async fn create_project(&self, token: &str, client_id: &str, title: &str) -> String {
        let response = self
            .post("/api/projects", token, json!({ "title": title, "clientId": client_id }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create project failed: {}", response.body);
        response.body["id"].as_str().unwrap().to_string()
    }
}

async fn decode(response: Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, headers, body }
}
