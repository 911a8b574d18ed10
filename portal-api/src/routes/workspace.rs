/// Workspace endpoints
///
/// - `GET /api/workspace` - Workspace with its members
/// - `PUT /api/workspace` - Rename or change logo (OWNER)
/// - `POST /api/workspace/members` - Add a STAFF member (OWNER)

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use axum::{extract::State, http::StatusCode, Extension, Json};
use portal_shared::auth::middleware::AuthContext;
use portal_shared::models::user::Member;
use portal_shared::models::workspace::{UpdateWorkspace, Workspace, WorkspaceDetails};
use portal_shared::services::{auth::MemberInvite, workspace};
use serde::Deserialize;
use validator::Validate;

use super::{double_option, IgnoredWorkspaceId};

/// Update request; absent fields are left alone, `"logoUrl": null` clears the logo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorkspaceRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

/// Add-member request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<WorkspaceDetails>> {
    let details = workspace::get_workspace(state.store.as_ref(), &auth).await?;
    Ok(Json(details))
}

pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<UpdateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    if let Some(Some(url)) = &req.logo_url {
        let url = url.trim();
        if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ApiError::invalid("logoUrl", "Logo URL must be an http(s) URL"));
        }
    }

    let updated = workspace::update_workspace(
        state.store.as_ref(),
        &auth,
        UpdateWorkspace {
            name: req.name,
            logo_url: req.logo_url,
        },
    )
    .await?;

    Ok(Json(updated))
}

pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    let member = state
        .auth
        .add_member(
            &auth,
            MemberInvite {
                email: req.email,
                password: req.password,
                name: req.name,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}
