/// Project endpoints
///
/// - `GET /api/projects` - Projects with client name and contact, newest first
/// - `POST /api/projects` - Create a project for one of the workspace's clients
/// - `GET /api/projects/:project_id` - Project with client, tasks and comments
/// - `POST /api/projects/:project_id/comments` - Comment as the caller
///
/// A project id or `clientId` from another workspace answers `404`.

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extract::{IdPath, ValidatedJson};
use axum::{extract::State, http::StatusCode, Extension, Json};
use portal_shared::auth::middleware::AuthContext;
use portal_shared::models::comment::{Comment, NewComment};
use portal_shared::models::project::{NewProject, Project, ProjectDetails, ProjectStatus, ProjectSummary};
use portal_shared::services::projects;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::IgnoredWorkspaceId;

/// Create-project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<ProjectStatus>,

    pub client_id: Uuid,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

/// Add-comment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1 to 5000 characters"))]
    pub content: String,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ProjectSummary>>> {
    let projects = projects::list_projects(state.store.as_ref(), &auth).await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = projects::create_project(
        state.store.as_ref(),
        &auth,
        NewProject {
            title: req.title,
            description: req.description,
            status: req.status,
            client_id: req.client_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    IdPath(project_id): IdPath<Uuid>,
) -> ApiResult<Json<ProjectDetails>> {
    let details = projects::get_project(state.store.as_ref(), &auth, project_id).await?;
    Ok(Json(details))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    IdPath(project_id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = projects::add_comment(
        state.store.as_ref(),
        &auth,
        project_id,
        NewComment { content: req.content },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
