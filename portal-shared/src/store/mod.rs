/// Tenant-scoped repository
///
/// [`PortalStore`] is the only way the rest of the system reads or writes
/// portal data. Every tenant-owned operation takes a [`TenantScope`], which can
/// only be built from a resolved [`AuthContext`]. Backends filter every read by
/// the scope's workspace and stamp it on every write; no input type carries a
/// workspace id of its own.
///
/// A row owned by another workspace is indistinguishable from a missing row:
/// lookups return `None`, and writes that reference a foreign parent return
/// `None` without writing anything.
///
/// # Backends
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx
/// - [`memory::MemoryStore`]: in-process, for tests and local runs
///
/// # Example
///
/// ```
/// use portal_shared::auth::middleware::AuthContext;
/// use portal_shared::models::client::NewClient;
/// use portal_shared::store::{memory::MemoryStore, PortalStore, TenantScope};
///
/// # async fn example(auth: AuthContext) -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let scope = TenantScope::from(&auth);
///
/// let client = store
///     .create_client(&scope, NewClient {
///         company_name: "Foo".to_string(),
///         contact_email: "f@foo.com".to_string(),
///         phone: None,
///     })
///     .await?;
/// assert_eq!(client.workspace_id, scope.workspace_id());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::middleware::AuthContext;
use crate::models::{
    client::{Client, NewClient},
    comment::{Comment, NewComment},
    project::{NewProject, Project, ProjectSummary},
    task::{NewTask, Task, TaskStatus},
    user::{Member, User},
    workspace::{UpdateWorkspace, Workspace},
};

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend-neutral store failures
///
/// "Not found" is not an error here; it is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key already exists
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The backend cannot be reached
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Datastore error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("users_email_key") => {
                        StoreError::UniqueViolation("Email already registered".to_string())
                    }
                    Some(constraint) => {
                        StoreError::UniqueViolation(format!("Duplicate value for {}", constraint))
                    }
                    None => StoreError::UniqueViolation("Duplicate value".to_string()),
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Workspace a store call is confined to
///
/// Has no public constructor other than from an [`AuthContext`], so a scope
/// always names the caller's own workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    workspace_id: Uuid,
}

impl TenantScope {
    pub(crate) fn for_workspace(workspace_id: Uuid) -> Self {
        Self { workspace_id }
    }

    /// The workspace every read is filtered by and every write is stamped with
    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }
}

impl From<&AuthContext> for TenantScope {
    fn from(auth: &AuthContext) -> Self {
        Self::for_workspace(auth.workspace_id)
    }
}

/// Workspace plus its owning user, created together
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Lowercased email of the owner
    pub email: String,

    /// Argon2id hash of the owner's secret
    pub password_hash: String,

    /// Owner display name
    pub name: String,

    /// Name of the new workspace
    pub workspace_name: String,
}

/// A STAFF user added to an existing workspace
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Lowercased email
    pub email: String,

    /// Argon2id hash of the member's secret
    pub password_hash: String,

    /// Display name
    pub name: String,
}

/// The data-access boundary of the portal
///
/// All list operations return newest first.
#[async_trait]
pub trait PortalStore: Send + Sync {
    /// Creates a workspace and its OWNER atomically
    ///
    /// Either both rows exist afterwards or neither does.
    ///
    /// # Errors
    ///
    /// `StoreError::UniqueViolation` if the email is already registered
    async fn register_workspace(&self, registration: NewRegistration) -> StoreResult<(Workspace, User)>;

    /// Looks up a user by lowercased email across all workspaces
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Adds a STAFF user to the scoped workspace
    async fn add_member(&self, scope: &TenantScope, member: NewMember) -> StoreResult<User>;

    async fn get_workspace(&self, scope: &TenantScope) -> StoreResult<Option<Workspace>>;

    async fn list_members(&self, scope: &TenantScope) -> StoreResult<Vec<Member>>;

    async fn update_workspace(
        &self,
        scope: &TenantScope,
        changes: UpdateWorkspace,
    ) -> StoreResult<Option<Workspace>>;

    async fn create_client(&self, scope: &TenantScope, client: NewClient) -> StoreResult<Client>;

    async fn list_clients(&self, scope: &TenantScope) -> StoreResult<Vec<Client>>;

    async fn find_client(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Client>>;

    /// Creates a project; `None` if its client is not in scope
    async fn create_project(
        &self,
        scope: &TenantScope,
        project: NewProject,
    ) -> StoreResult<Option<Project>>;

    async fn list_projects(&self, scope: &TenantScope) -> StoreResult<Vec<ProjectSummary>>;

    async fn find_project(&self, scope: &TenantScope, id: Uuid) -> StoreResult<Option<Project>>;

    /// Creates a task; `None` if the project is not in scope
    async fn create_task(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task: NewTask,
    ) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Sets a task's status; `None` if no task matches (task, project, scope)
    async fn update_task_status(
        &self,
        scope: &TenantScope,
        project_id: Uuid,
        task_id: Uuid,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>>;

    /// Adds a comment; `None` if the project is not in scope
    async fn create_comment(
        &self,
        scope: &TenantScope,
        author_id: Uuid,
        project_id: Uuid,
        comment: NewComment,
    ) -> StoreResult<Option<Comment>>;

    async fn list_comments(&self, scope: &TenantScope, project_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
