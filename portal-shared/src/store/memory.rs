/// In-memory [`PortalStore`]
///
/// Same contract as the PostgreSQL store, held in a `tokio::sync::RwLock`.
/// Rows are kept in insertion order, so iterating in reverse yields newest
/// first. Registration stages its inserts on a copy of the state and swaps it
/// in only when both succeed.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewMember, NewRegistration, PortalStore, StoreError, StoreResult, TenantScope};
use crate::models::{
    client::{Client, ClientBrief, NewClient},
    comment::{Comment, NewComment},
    project::{NewProject, Project, ProjectSummary},
    task::{NewTask, Task, TaskStatus},
    user::{CreateUser, Member, User, UserRole},
    workspace::{UpdateWorkspace, Workspace},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    workspaces: Vec<Workspace>,
    users: Vec<User>,
    clients: Vec<Client>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

impl MemoryState {
    fn insert_workspace(&mut self, name: String) -> Workspace {
        let now = Utc::now();
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name,
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        self.workspaces.push(workspace.clone());
        workspace
    }

    fn insert_user(&mut self, data: CreateUser) -> StoreResult<User> {
        if self.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("Email already registered".to_string()));
        }
        if !self.workspaces.iter().any(|w| w.id == data.workspace_id) {
            return Err(StoreError::Backend("workspace does not exist".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            role: data.role,
            workspace_id: data.workspace_id,
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn project_in_scope(&self, scope: &TenantScope, project_id: Uuid) -> bool {
        self.projects
            .iter()
            .any(|p| p.id == project_id && p.workspace_id == scope.workspace_id())
    }
}

/// Store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of workspaces currently stored
    pub async fn workspace_count(&self) -> usize {
        self.state.read().await.workspaces.len()
    }

    /// Raw user record, including the stored hash
    pub async fn user_record(&self, id: Uuid) -> Option<User> {
        self.state.read().await.users.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn register_workspace(&self, registration: NewRegistration) -> StoreResult<(Workspace, User)> {
        let mut state = self.state.write().await;
        let mut staged = state.clone();

        let workspace = staged.insert_workspace(registration.workspace_name);
        let user = staged.insert_user(CreateUser {
            email: registration.email,
            password_hash: registration.password_hash,
            name: registration.name,
            role: UserRole::Owner,
            workspace_id: workspace.id,
        })?;

        *state = staged;
        Ok((workspace, user))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn add_member(&self, scope: &TenantScope, member: NewMember) -> StoreResult<User> {
        let mut state = self.state.write().await;
        state.insert_user(CreateUser {
            email: member.email,
            password_hash: member.password_hash,
            name: member.name,
            role: UserRole::Staff,
            workspace_id: scope.workspace_id(),
        })
    }

    async fn get_workspace(&self, scope: &TenantScope) -> StoreResult<Option<Workspace>> {
        let state = self.state.read().await;
        Ok(state
            .workspaces
            .iter()
            .find(|w| w.id == scope.workspace_id())
            .cloned())
    }

    async fn list_members(&self, scope: &TenantScope) -> StoreResult<Vec<Member>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .rev()
            .filter(|u| u.workspace_id == scope.workspace_id())
            .map(Member::from)
            .collect())
    }

    async fn update_workspace(
        &self,
        scope: &TenantScope,
        changes: UpdateWorkspace,
    ) -> StoreResult<Option<Workspace>> {
        let mut state = self.state.write().await;
        let Some(workspace) = state
            .workspaces
            .iter_mut()
            .find(|w| w.id == scope.workspace_id())
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            workspace.name = name;
        }
        if let Some(logo_url) = changes.logo_url {
            workspace.logo_url = logo_url;
        }
        workspace.updated_at = Utc::now();

        Ok(Some(workspace.clone()))
    }

    async fn create_client(&self, scope: &TenantScope, client: NewClient) -> StoreResult<Client> {
        let mut state = self.state.write().await;
        let client = Client {
            id: Uuid::new_v4(),
            company_name: client.company_name,
            contact_email: client.contact_email,
            phone: client.phone,
            workspace_id: scope.workspace_id(),
            created_at: Utc::now(),
        };
        state.clients.push(client.clone());
        Ok(client)
    }

    async fn list_clients(&self, scope: &TenantScope) -> StoreResult<Vec<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .rev()
            .filter(|c| c.workspace_id == scope.workspace_id())
            .cloned()
            .collect())
    }

    async fn find_client(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Client>> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .find(|c| c.id == id && c.workspace_id == scope.workspace_id())
            .cloned())
    }

    async fn create_project(
        &self,
        scope: &TenantScope,
        project: NewProject,
    ) -> StoreResult<Option<Project>> {
        let mut state = self.state.write().await;
        let client_in_scope = state
            .clients
            .iter()
            .any(|c| c.id == project.client_id && c.workspace_id == scope.workspace_id());
        if !client_in_scope {
            return Ok(None);
        }

        let project = Project {
            id: Uuid::new_v4(),
            title: project.title,
            description: project.description,
            status: project.status.unwrap_or_default(),
            client_id: project.client_id,
            workspace_id: scope.workspace_id(),
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());
        Ok(Some(project))
    }

    async fn list_projects(&self, scope: &TenantScope) -> StoreResult<Vec<ProjectSummary>> {
        let state = self.state.read().await;
        let summaries = state
            .projects
            .iter()
            .rev()
            .filter(|p| p.workspace_id == scope.workspace_id())
            .filter_map(|p| {
                state
                    .clients
                    .iter()
                    .find(|c| c.id == p.client_id && c.workspace_id == p.workspace_id)
                    .map(|c| ProjectSummary {
                        project: p.clone(),
                        client: ClientBrief::from(c),
                    })
            })
            .collect();
        Ok(summaries)
    }

    async fn find_project(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .find(|p| p.id == id && p.workspace_id == scope.workspace_id())
            .cloned())
    }

    async fn create_task(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task: NewTask,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        if !state.project_in_scope(scope, project_id) {
            return Ok(None);
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status.unwrap_or_default(),
            priority: task.priority.unwrap_or_default(),
            project_id,
            workspace_id: scope.workspace_id(),
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn list_tasks(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .rev()
            .filter(|t| t.project_id == project_id && t.workspace_id == scope.workspace_id())
            .cloned()
            .collect())
    }

    async fn update_task_status(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let task = state.tasks.iter_mut().find(|t| {
            t.id == task_id && t.project_id == project_id && t.workspace_id == scope.workspace_id()
        });

        Ok(task.map(|task| {
            task.status = status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn create_comment(
        &self,
        scope: &TenantScope,
        author_id: Uuid,
        project_id: Uuid,
        comment: NewComment,
    ) -> StoreResult<Option<Comment>> {
        let mut state = self.state.write().await;
        if !state.project_in_scope(scope, project_id) {
            return Ok(None);
        }

        let author_name = state
            .users
            .iter()
            .find(|u| u.id == author_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| StoreError::Backend("comment author does not exist".to_string()))?;

        let comment = Comment {
            id: Uuid::new_v4(),
            content: comment.content,
            project_id,
            user_id: author_id,
            author_name,
            workspace_id: scope.workspace_id(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(Some(comment))
    }

    async fn list_comments(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .rev()
            .filter(|c| c.project_id == project_id && c.workspace_id == scope.workspace_id())
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, workspace: &str) -> NewRegistration {
        NewRegistration {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: "Owner".to_string(),
            workspace_name: workspace.to_string(),
        }
    }

    fn new_client(name: &str) -> NewClient {
        NewClient {
            company_name: name.to_string(),
            contact_email: format!("hello@{}.com", name.to_lowercase()),
            phone: None,
        }
    }

    async fn registered(store: &MemoryStore, email: &str) -> (TenantScope, User) {
        let (workspace, user) = store
            .register_workspace(registration(email, "Acme"))
            .await
            .unwrap();
        (TenantScope::for_workspace(workspace.id), user)
    }

    #[tokio::test]
    async fn test_register_creates_owner() {
        let store = MemoryStore::new();
        let (workspace, user) = store
            .register_workspace(registration("a@acme.com", "Acme"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Owner);
        assert_eq!(user.workspace_id, workspace.id);
        assert_eq!(store.workspace_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_failure_leaves_no_workspace() {
        let store = MemoryStore::new();
        store
            .register_workspace(registration("a@acme.com", "Acme"))
            .await
            .unwrap();

        let result = store
            .register_workspace(registration("a@acme.com", "Acme Again"))
            .await;

        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.workspace_count().await, 1);
    }

    #[tokio::test]
    async fn test_lists_are_scoped_and_newest_first() {
        let store = MemoryStore::new();
        let (acme, _) = registered(&store, "a@acme.com").await;
        let (beta, _) = registered(&store, "b@beta.com").await;

        store.create_client(&acme, new_client("First")).await.unwrap();
        store.create_client(&beta, new_client("Other")).await.unwrap();
        store.create_client(&acme, new_client("Second")).await.unwrap();

        let names: Vec<String> = store
            .list_clients(&acme)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.company_name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_foreign_parent_is_not_linked() {
        let store = MemoryStore::new();
        let (acme, _) = registered(&store, "a@acme.com").await;
        let (beta, _) = registered(&store, "b@beta.com").await;

        let acme_client = store.create_client(&acme, new_client("Foo")).await.unwrap();
        let project = store
            .create_project(
                &beta,
                NewProject {
                    title: "Hijack".to_string(),
                    description: None,
                    status: None,
                    client_id: acme_client.id,
                },
            )
            .await
            .unwrap();

        assert!(project.is_none());
        assert!(store.list_projects(&beta).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_task_status_requires_full_match() {
        let store = MemoryStore::new();
        let (acme, _) = registered(&store, "a@acme.com").await;
        let (beta, _) = registered(&store, "b@beta.com").await;

        let client = store.create_client(&acme, new_client("Foo")).await.unwrap();
        let project = store
            .create_project(
                &acme,
                NewProject {
                    title: "Site".to_string(),
                    description: None,
                    status: None,
                    client_id: client.id,
                },
            )
            .await
            .unwrap()
            .unwrap();
        let task = store
            .create_task(
                &acme,
                project.id,
                NewTask {
                    title: "Wireframes".to_string(),
                    description: None,
                    status: None,
                    priority: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        let foreign = store
            .update_task_status(&beta, project.id, task.id, TaskStatus::Done)
            .await
            .unwrap();
        assert!(foreign.is_none());

        let wrong_project = store
            .update_task_status(&acme, Uuid::new_v4(), task.id, TaskStatus::Done)
            .await
            .unwrap();
        assert!(wrong_project.is_none());

        let updated = store
            .update_task_status(&acme, project.id, task.id, TaskStatus::Done)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
    }
}
