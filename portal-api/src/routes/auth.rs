/// Authentication endpoints
///
/// - `POST /api/auth/register` - Create a workspace and its owner
/// - `POST /api/auth/login` - Exchange email and password for a session token
/// - `GET /api/auth/me` - Identity resolved from the bearer token

use crate::{error::ApiResult, extract::ValidatedJson};
use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Extension, Json};
use portal_shared::auth::middleware::AuthContext;
use portal_shared::services::auth::{Registration, Session};
use serde::Deserialize;
use validator::Validate;

use super::IgnoredWorkspaceId;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Workspace name must be 1 to 100 characters"))]
    pub workspace_name: String,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register a new workspace
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "a@acme.com",
///   "password": "secret123",
///   "name": "Alice",
///   "workspaceName": "Acme"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": "uuid", "email": "a@acme.com", "name": "Alice", "role": "OWNER", "workspaceId": "uuid", "createdAt": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let session = state
        .auth
        .register_session(Registration {
            email: req.email,
            password: req.password,
            name: req.name,
            workspace_name: req.workspace_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "a@acme.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized` (`invalid_credentials`): unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<Session>> {
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// Current identity
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<AuthContext> {
    Json(auth)
}
