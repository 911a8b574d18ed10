/// Tasks inside a project

use tracing::info;
use uuid::Uuid;

use super::{optional_text, require_text};
use crate::auth::authorization::{authorize, Operation};
use crate::auth::middleware::AuthContext;
use crate::error::{PortalError, PortalResult};
use crate::models::task::{NewTask, Task, TaskStatus};
use crate::store::{PortalStore, TenantScope};

pub async fn create_task(
    store: &dyn PortalStore,
    auth: &AuthContext,
    project_id: Uuid,
    input: NewTask,
) -> PortalResult<Task> {
    authorize(auth, Operation::CreateTask)?;

    let input = NewTask {
        title: require_text("title", &input.title)?,
        description: optional_text(input.description),
        ..input
    };

    let task = store
        .create_task(&TenantScope::from(auth), project_id, input)
        .await?
        .ok_or_else(|| PortalError::NotFound("Project not found".to_string()))?;

    info!(
        workspace_id = %auth.workspace_id,
        project_id = %project_id,
        task_id = %task.id,
        "Task created"
    );

    Ok(task)
}

/// Tasks of a project, newest first
///
/// Fails with `NotFound` when the project is not in the caller's workspace,
/// rather than returning an empty list.
pub async fn list_tasks(
    store: &dyn PortalStore,
    auth: &AuthContext,
    project_id: Uuid,
) -> PortalResult<Vec<Task>> {
    let scope = TenantScope::from(auth);

    if store.find_project(&scope, project_id).await?.is_none() {
        return Err(PortalError::NotFound("Project not found".to_string()));
    }

    Ok(store.list_tasks(&scope, project_id).await?)
}

/// Moves a task to `status`
///
/// The task must belong to `project_id` and to the caller's workspace.
pub async fn update_task_status(
    store: &dyn PortalStore,
    auth: &AuthContext,
    project_id: Uuid,
    task_id: Uuid,
    status: TaskStatus,
) -> PortalResult<Task> {
    authorize(auth, Operation::UpdateTaskStatus)?;

    let task = store
        .update_task_status(&TenantScope::from(auth), project_id, task_id, status)
        .await?
        .ok_or_else(|| PortalError::NotFound("Task not found".to_string()))?;

    info!(
        workspace_id = %auth.workspace_id,
        task_id = %task.id,
        status = ?task.status,
        "Task status updated"
    );

    Ok(task)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::client::NewClient;
    use crate::models::project::NewProject;
    use crate::models::task::TaskPriority;
    use crate::services::test_support::{owner, staff};
    use crate::services::{clients::create_client, projects::create_project};
    use crate::store::memory::MemoryStore;

    async fn project_of(store: &MemoryStore, auth: &AuthContext) -> Uuid {
        let client = create_client(
            store,
            auth,
            NewClient {
                company_name: "Foo".to_string(),
                contact_email: "hello@foo.com".to_string(),
                phone: None,
            },
        )
        .await
        .unwrap();

        create_project(
            store,
            auth,
            NewProject {
                title: "Website".to_string(),
                description: None,
                status: None,
                client_id: client.id,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn wireframes() -> NewTask {
        NewTask {
            title: "Wireframes".to_string(),
            description: Some("Homepage and pricing".to_string()),
            status: None,
            priority: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;
        let project_id = project_of(&store, &acme).await;

        let task = create_task(store.as_ref(), &acme, project_id, wireframes()).await.unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.project_id, project_id);
        assert_eq!(task.workspace_id, acme.workspace_id);
    }

    #[tokio::test]
    async fn test_create_task_in_foreign_project_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;
        let beta = owner(&store, "b@beta.com", "Beta").await;
        let project_id = project_of(&store, &acme).await;

        assert!(matches!(
            create_task(store.as_ref(), &beta, project_id, wireframes()).await,
            Err(PortalError::NotFound(_))
        ));
        assert!(matches!(
            list_tasks(store.as_ref(), &beta, project_id).await,
            Err(PortalError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_task_status() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;
        let sam = staff(&store, &acme, "s@acme.com").await;
        let beta = owner(&store, "b@beta.com", "Beta").await;
        let project_id = project_of(&store, &acme).await;
        let task = create_task(store.as_ref(), &acme, project_id, wireframes()).await.unwrap();

        let updated = update_task_status(store.as_ref(), &sam, project_id, task.id, TaskStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        assert!(matches!(
            update_task_status(store.as_ref(), &beta, project_id, task.id, TaskStatus::Done).await,
            Err(PortalError::NotFound(_))
        ));

        let other_project = project_of(&store, &acme).await;
        assert!(matches!(
            update_task_status(store.as_ref(), &acme, other_project, task.id, TaskStatus::Done).await,
            Err(PortalError::NotFound(_))
        ));

        let tasks = list_tasks(store.as_ref(), &acme, project_id).await.unwrap();
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
    }
}
