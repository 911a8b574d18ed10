/// Client endpoints
///
/// - `GET /api/clients` - Clients of the caller's workspace, newest first
/// - `POST /api/clients` - Create a client (OWNER, STAFF)

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use axum::{extract::State, http::StatusCode, Extension, Json};
use portal_shared::auth::middleware::AuthContext;
use portal_shared::models::client::{Client, NewClient};
use portal_shared::services::clients;
use serde::Deserialize;
use validator::Validate;

use super::IgnoredWorkspaceId;

/// Create-client request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200, message = "Company name must be 1 to 200 characters"))]
    pub company_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,

    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

pub async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Client>>> {
    let clients = clients::list_clients(state.store.as_ref(), &auth).await?;
    Ok(Json(clients))
}

pub async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = clients::create_client(
        state.store.as_ref(),
        &auth,
        NewClient {
            company_name: req.company_name,
            contact_email: req.contact_email,
            phone: req.phone,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(client)))
}
