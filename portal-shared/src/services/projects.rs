/// Projects and their comment threads
///
/// A project always references a client of the same workspace; a `clientId`
/// from anywhere else is reported as `NotFound`.

use tracing::{debug, info};
use uuid::Uuid;

use super::{optional_text, require_text};
use crate::auth::authorization::{authorize, Operation};
use crate::auth::middleware::AuthContext;
use crate::error::{PortalError, PortalResult};
use crate::models::comment::{Comment, NewComment};
use crate::models::project::{NewProject, Project, ProjectDetails, ProjectSummary};
use crate::store::{PortalStore, TenantScope};

fn project_not_found() -> PortalError {
    PortalError::NotFound("Project not found".to_string())
}

pub async fn create_project(
    store: &dyn PortalStore,
    auth: &AuthContext,
    input: NewProject,
) -> PortalResult<Project> {
    authorize(auth, Operation::CreateProject)?;

    let input = NewProject {
        title: require_text("title", &input.title)?,
        description: optional_text(input.description),
        ..input
    };

    let project = store
        .create_project(&TenantScope::from(auth), input)
        .await?
        .ok_or_else(|| PortalError::NotFound("Client not found".to_string()))?;

    info!(
        workspace_id = %auth.workspace_id,
        project_id = %project.id,
        client_id = %project.client_id,
        "Project created"
    );

    Ok(project)
}

/// Projects with their client's name and contact, newest first
pub async fn list_projects(
    store: &dyn PortalStore,
    auth: &AuthContext,
) -> PortalResult<Vec<ProjectSummary>> {
    Ok(store.list_projects(&TenantScope::from(auth)).await?)
}

/// A project with its full client record, tasks and comments
pub async fn get_project(
    store: &dyn PortalStore,
    auth: &AuthContext,
    project_id: Uuid,
) -> PortalResult<ProjectDetails> {
    let scope = TenantScope::from(auth);

    let project = store
        .find_project(&scope, project_id)
        .await?
        .ok_or_else(project_not_found)?;

    let client = store
        .find_client(&scope, project.client_id)
        .await?
        .ok_or_else(|| {
            debug!(project_id = %project.id, "Project client missing from scope");
            project_not_found()
        })?;

    let tasks = store.list_tasks(&scope, project.id).await?;
    let comments = store.list_comments(&scope, project.id).await?;

    Ok(ProjectDetails {
        project,
        client,
        tasks,
        comments,
    })
}

/// Posts a comment on a project as the caller
pub async fn add_comment(
    store: &dyn PortalStore,
    auth: &AuthContext,
    project_id: Uuid,
    input: NewComment,
) -> PortalResult<Comment> {
    authorize(auth, Operation::CreateComment)?;

    let input = NewComment {
        content: require_text("content", &input.content)?,
    };

    let comment = store
        .create_comment(&TenantScope::from(auth), auth.principal_id, project_id, input)
        .await?
        .ok_or_else(project_not_found)?;

    info!(
        workspace_id = %auth.workspace_id,
        project_id = %project_id,
        comment_id = %comment.id,
        "Comment added"
    );

    Ok(comment)
}
