/// PostgreSQL-backed [`PortalStore`]
///
/// Thin adapter over the model queries in [`crate::models`]. Registration is
/// the only multi-statement write and runs in a single transaction; an early
/// return drops the transaction, which rolls it back.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{NewMember, NewRegistration, PortalStore, StoreResult, TenantScope};
use crate::models::{
    client::{Client, NewClient},
    comment::{Comment, NewComment},
    project::{NewProject, Project, ProjectSummary},
    task::{NewTask, Task, TaskStatus},
    user::{CreateUser, Member, User, UserRole},
    workspace::{CreateWorkspace, UpdateWorkspace, Workspace},
};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortalStore for PgStore {
    async fn register_workspace(&self, registration: NewRegistration) -> StoreResult<(Workspace, User)> {
        let mut tx = self.pool.begin().await?;

        let workspace = Workspace::create(
            &mut *tx,
            CreateWorkspace {
                name: registration.workspace_name,
            },
        )
        .await?;

        let user = User::create(
            &mut *tx,
            CreateUser {
                email: registration.email,
                password_hash: registration.password_hash,
                name: registration.name,
                role: UserRole::Owner,
                workspace_id: workspace.id,
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            workspace_id = %workspace.id,
            user_id = %user.id,
            "Registered workspace"
        );

        Ok((workspace, user))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn add_member(&self, scope: &TenantScope, member: NewMember) -> StoreResult<User> {
        let user = User::create(
            &self.pool,
            CreateUser {
                email: member.email,
                password_hash: member.password_hash,
                name: member.name,
                role: UserRole::Staff,
                workspace_id: scope.workspace_id(),
            },
        )
        .await?;

        Ok(user)
    }

    async fn get_workspace(&self, scope: &TenantScope) -> StoreResult<Option<Workspace>> {
        Ok(Workspace::find_by_id(&self.pool, scope.workspace_id()).await?)
    }

    async fn list_members(&self, scope: &TenantScope) -> StoreResult<Vec<Member>> {
        Ok(User::list_members(&self.pool, scope.workspace_id()).await?)
    }

    async fn update_workspace(
        &self,
        scope: &TenantScope,
        changes: UpdateWorkspace,
    ) -> StoreResult<Option<Workspace>> {
        Ok(Workspace::update(&self.pool, scope.workspace_id(), changes).await?)
    }

    async fn create_client(&self, scope: &TenantScope, client: NewClient) -> StoreResult<Client> {
        Ok(Client::create(&self.pool, scope.workspace_id(), client).await?)
    }

    async fn list_clients(&self, scope: &TenantScope) -> StoreResult<Vec<Client>> {
        Ok(Client::list_by_workspace(&self.pool, scope.workspace_id()).await?)
    }

    async fn find_client(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Client>> {
        Ok(Client::find_by_id_and_workspace(&self.pool, id, scope.workspace_id()).await?)
    }

    async fn create_project(
        &self,
        scope: &TenantScope,
        project: NewProject,
    ) -> StoreResult<Option<Project>> {
        let client_id = project.client_id;
        let created = Project::create(&self.pool, scope.workspace_id(), project).await?;

        if created.is_none() {
            debug!(
                workspace_id = %scope.workspace_id(),
                client_id = %client_id,
                "Project not created: client outside workspace"
            );
        }

        Ok(created)
    }

    async fn list_projects(&self, scope: &TenantScope) -> StoreResult<Vec<ProjectSummary>> {
        Ok(Project::list_by_workspace(&self.pool, scope.workspace_id()).await?)
    }

    async fn find_project(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id_and_workspace(&self.pool, id, scope.workspace_id()).await?)
    }

    async fn create_task(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task: NewTask,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::create(&self.pool, scope.workspace_id(), project_id, task).await?)
    }

    async fn list_tasks(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_project(&self.pool, scope.workspace_id(), project_id).await?)
    }

    async fn update_task_status(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::update_status(&self.pool, scope.workspace_id(), project_id, task_id, status).await?)
    }

    async fn create_comment(
        &self,
        scope: &TenantScope,
        author_id: Uuid,
        project_id: Uuid,
        comment: NewComment,
    ) -> StoreResult<Option<Comment>> {
        Ok(Comment::create(&self.pool, scope.workspace_id(), project_id, author_id, comment).await?)
    }

    async fn list_comments(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list_by_project(&self.pool, scope.workspace_id(), project_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
