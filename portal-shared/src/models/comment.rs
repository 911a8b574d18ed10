/// Project comment model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     content TEXT NOT NULL,
///     project_id UUID NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     FOREIGN KEY (project_id, workspace_id) REFERENCES projects(id, workspace_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment with its author's display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub project_id: Uuid,
    pub user_id: Uuid,

    /// Joined from `users.name`
    pub author_name: String,

    pub workspace_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
}

impl Comment {
    /// Adds a comment by `user_id` to `project_id`
    ///
    /// # Returns
    ///
    /// The new comment, or None if the project is not part of `workspace_id`
    pub async fn create(
        pool: &PgPool,
        workspace_id: Uuid,
        project_id: Uuid,
        user_id: Uuid,
        data: NewComment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (content, project_id, user_id, workspace_id)
                SELECT $1, p.id, $2, p.workspace_id
                FROM projects p
                WHERE p.id = $3 AND p.workspace_id = $4
                RETURNING id, content, project_id, user_id, workspace_id, created_at
            )
            SELECT i.id, i.content, i.project_id, i.user_id, u.name AS author_name,
                   i.workspace_id, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(data.content)
        .bind(user_id)
        .bind(project_id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists a project's comments, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        workspace_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.content, c.project_id, c.user_id, u.name AS author_name,
                   c.workspace_id, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.workspace_id = $1 AND c.project_id = $2
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(workspace_id)
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
