/// Task model and database operations
///
/// Tasks are work items inside a project. A task's project must belong to the
/// same workspace as the task.
///
/// # Status
///
/// ```text
/// TODO → IN_PROGRESS → REVIEW → DONE
/// ```
///
/// Any status may be set directly; the board toggles TODO/DONE freely.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'REVIEW', 'DONE');
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'TODO',
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     project_id UUID NOT NULL,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     FOREIGN KEY (project_id, workspace_id) REFERENCES projects(id, workspace_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task progress status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// Project in the same workspace
    pub project_id: Uuid,

    /// Owning workspace (immutable)
    pub workspace_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,

    /// Defaults to [`TaskStatus::Todo`]
    pub status: Option<TaskStatus>,

    /// Defaults to [`TaskPriority::Medium`]
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Inserts a task under `project_id`
    ///
    /// # Returns
    ///
    /// The new task, or None if the project is not part of `workspace_id`
    pub async fn create(
        pool: &PgPool,
        workspace_id: Uuid,
        project_id: Uuid,
        data: NewTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, project_id, workspace_id)
            SELECT $1, $2, $3, $4, p.id, p.workspace_id
            FROM projects p
            WHERE p.id = $5 AND p.workspace_id = $6
            RETURNING id, title, description, status, priority, project_id, workspace_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status.unwrap_or_default())
        .bind(data.priority.unwrap_or_default())
        .bind(project_id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        workspace_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, project_id, workspace_id,
                   created_at, updated_at
            FROM tasks
            WHERE workspace_id = $1 AND project_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id)
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Sets a task's status
    ///
    /// Filters on all three of task, project and workspace.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task matches that triple
    pub async fn update_status(
        pool: &PgPool,
        workspace_id: Uuid,
        project_id: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND project_id = $3 AND workspace_id = $4
            RETURNING id, title, description, status, priority, project_id, workspace_id,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(id)
        .bind(project_id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
