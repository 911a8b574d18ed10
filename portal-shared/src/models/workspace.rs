/// Workspace (tenant) model and database operations
///
/// A workspace is an isolated customer organization. Every user, client,
/// project, task and comment belongs to exactly one workspace.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     logo_url VARCHAR(1024),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgExecutor, PgPool};
use uuid::Uuid;

use super::user::Member;

/// Workspace model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique workspace ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional logo shown in the portal header
    pub logo_url: Option<String>,

    /// When the workspace was created
    pub created_at: DateTime<Utc>,

    /// When the workspace was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workspace (registration only)
#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: String,
}

/// Input for updating a workspace
///
/// Only non-None fields are written. `logo_url: Some(None)` clears the logo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkspace {
    /// New display name
    pub name: Option<String>,

    /// New logo URL (use Some(None) to clear)
    pub logo_url: Option<Option<String>>,
}

impl UpdateWorkspace {
    /// True when the update would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo_url.is_none()
    }
}

/// Workspace together with its members
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDetails {
    #[serde(flatten)]
    pub workspace: Workspace,

    pub users: Vec<Member>,
}

impl Workspace {
    /// Inserts a workspace
    ///
    /// Generic over the executor so registration can run it inside its transaction.
    pub async fn create<'e, E>(executor: E, data: CreateWorkspace) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name)
            VALUES ($1)
            RETURNING id, name, logo_url, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .fetch_one(executor)
        .await?;

        Ok(workspace)
    }

    /// Finds a workspace by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, logo_url, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(workspace)
    }

    /// Updates a workspace
    ///
    /// Builds the SET list from the fields present in `data`.
    ///
    /// # Returns
    ///
    /// The updated workspace, or None if no row has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateWorkspace,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE workspaces SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.logo_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", logo_url = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, name, logo_url, created_at, updated_at");

        let mut q = sqlx::query_as::<_, Workspace>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(logo_url) = data.logo_url {
            q = q.bind(logo_url);
        }

        let workspace = q.fetch_optional(pool).await?;

        Ok(workspace)
    }

    /// Counts workspaces
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workspaces")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_workspace_default_is_empty() {
        let update = UpdateWorkspace::default();
        assert!(update.is_empty());

        let update = UpdateWorkspace {
            logo_url: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_details_flatten_workspace() {
        let details = WorkspaceDetails {
            workspace: Workspace {
                id: Uuid::new_v4(),
                name: "Acme".to_string(),
                logo_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            users: vec![],
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "Acme");
        assert!(json["logoUrl"].is_null());
        assert!(json["users"].as_array().unwrap().is_empty());
    }
}
