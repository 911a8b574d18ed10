/// Task endpoints
///
/// - `GET /api/projects/:project_id/tasks` - Tasks of a project, newest first
/// - `POST /api/projects/:project_id/tasks` - Create a task
/// - `PUT /api/projects/:project_id/tasks/:task_id/status` - Move a task
///
/// # Statuses
///
/// `TODO`, `IN_PROGRESS`, `REVIEW`, `DONE`. Priorities are `Low`, `Medium`,
/// `High`.

use crate::app::AppState;
use crate::error::ApiResult;
use crate::extract::{IdPath, ValidatedJson};
use axum::{extract::State, http::StatusCode, Extension, Json};
use portal_shared::auth::middleware::AuthContext;
use portal_shared::models::task::{NewTask, Task, TaskPriority, TaskStatus};
use portal_shared::services::tasks;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::IgnoredWorkspaceId;

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

/// Status-change request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,

    #[serde(default, rename = "workspaceId")]
    _workspace_id: IgnoredWorkspaceId,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    IdPath(project_id): IdPath<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::list_tasks(state.store.as_ref(), &auth, project_id).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    IdPath(project_id): IdPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = tasks::create_task(
        state.store.as_ref(),
        &auth,
        project_id,
        NewTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    IdPath((project_id, task_id)): IdPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = tasks::update_task_status(state.store.as_ref(), &auth, project_id, task_id, req.status).await?;
    Ok(Json(task))
}
