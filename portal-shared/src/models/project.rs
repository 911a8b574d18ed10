/// Project model and database operations
///
/// A project is run for one client. The client must live in the same
/// workspace as the project; the schema enforces this with a composite
/// foreign key and [`Project::create`] checks it before inserting.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('ACTIVE', 'ON_HOLD', 'COMPLETED', 'ARCHIVED');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status project_status NOT NULL DEFAULT 'ACTIVE',
///     client_id UUID NOT NULL,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (id, workspace_id),
///     FOREIGN KEY (client_id, workspace_id) REFERENCES clients(id, workspace_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::client::{Client, ClientBrief};
use super::comment::Comment;
use super::task::Task;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

/// Project model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,

    /// Client in the same workspace
    pub client_id: Uuid,

    /// Owning workspace (immutable)
    pub workspace_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,

    /// Defaults to [`ProjectStatus::Active`]
    pub status: Option<ProjectStatus>,

    pub client_id: Uuid,
}

/// Project as shown in the project list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,

    pub client: ClientBrief,
}

/// Project page: the project with its client, tasks and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,

    pub client: Client,
    pub tasks: Vec<Task>,
    pub comments: Vec<Comment>,
}

#[derive(sqlx::FromRow)]
struct ProjectSummaryRow {
    #[sqlx(flatten)]
    project: Project,
    company_name: String,
    contact_email: String,
}

impl From<ProjectSummaryRow> for ProjectSummary {
    fn from(row: ProjectSummaryRow) -> Self {
        Self {
            project: row.project,
            client: ClientBrief {
                company_name: row.company_name,
                contact_email: row.contact_email,
            },
        }
    }
}

impl Project {
    /// Inserts a project into `workspace_id`
    ///
    /// The client row is selected under the same workspace filter, so a client
    /// from another workspace (or an unknown id) inserts nothing.
    ///
    /// # Returns
    ///
    /// The new project, or None if `data.client_id` is not a client of `workspace_id`
    pub async fn create(
        pool: &PgPool,
        workspace_id: Uuid,
        data: NewProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, status, client_id, workspace_id)
            SELECT $1, $2, $3, c.id, c.workspace_id
            FROM clients c
            WHERE c.id = $4 AND c.workspace_id = $5
            RETURNING id, title, description, status, client_id, workspace_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status.unwrap_or_default())
        .bind(data.client_id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID within a workspace
    pub async fn find_by_id_and_workspace(
        pool: &PgPool,
        id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, status, client_id, workspace_id, created_at
            FROM projects
            WHERE id = $1 AND workspace_id = $2
            "#,
        )
        .bind(id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists a workspace's projects with their client, newest first
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: Uuid,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectSummaryRow>(
            r#"
            SELECT p.id, p.title, p.description, p.status, p.client_id, p.workspace_id,
                   p.created_at, c.company_name, c.contact_email
            FROM projects p
            JOIN clients c ON c.id = p.client_id AND c.workspace_id = p.workspace_id
            WHERE p.workspace_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ProjectSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_and_wire_format() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnHold).unwrap(),
            "\"ON_HOLD\""
        );
        let parsed: ProjectStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Completed);
    }

    #[test]
    fn test_summary_serializes_client_brief() {
        let summary = ProjectSummary {
            project: Project {
                id: Uuid::new_v4(),
                title: "Website".to_string(),
                description: None,
                status: ProjectStatus::Active,
                client_id: Uuid::new_v4(),
                workspace_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
            client: ClientBrief {
                company_name: "Foo".to_string(),
                contact_email: "f@foo.com".to_string(),
            },
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Website");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["client"]["companyName"], "Foo");
        assert_eq!(json["client"]["contactEmail"], "f@foo.com");
    }
}
