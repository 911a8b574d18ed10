/// Client (customer record) model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE clients (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_name VARCHAR(255) NOT NULL,
///     contact_email VARCHAR(320) NOT NULL,
///     phone VARCHAR(64),
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (id, workspace_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Client model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub company_name: String,
    pub contact_email: String,
    pub phone: Option<String>,

    /// Owning workspace (immutable, stamped from the creator's session)
    pub workspace_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a client
///
/// Carries no workspace: the store stamps it from the tenant scope.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub company_name: String,
    pub contact_email: String,
    pub phone: Option<String>,
}

/// Abbreviated client shown next to each project in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBrief {
    pub company_name: String,
    pub contact_email: String,
}

impl From<&Client> for ClientBrief {
    fn from(client: &Client) -> Self {
        Self {
            company_name: client.company_name.clone(),
            contact_email: client.contact_email.clone(),
        }
    }
}

impl Client {
    /// Inserts a client into `workspace_id`
    pub async fn create(
        pool: &PgPool,
        workspace_id: Uuid,
        data: NewClient,
    ) -> Result<Self, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (company_name, contact_email, phone, workspace_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_name, contact_email, phone, workspace_id, created_at
            "#,
        )
        .bind(data.company_name)
        .bind(data.contact_email)
        .bind(data.phone)
        .bind(workspace_id)
        .fetch_one(pool)
        .await?;

        Ok(client)
    }

    /// Finds a client by ID within a workspace
    pub async fn find_by_id_and_workspace(
        pool: &PgPool,
        id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, company_name, contact_email, phone, workspace_id, created_at
            FROM clients
            WHERE id = $1 AND workspace_id = $2
            "#,
        )
        .bind(id)
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;

        Ok(client)
    }

    /// Lists a workspace's clients, newest first
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, company_name, contact_email, phone, workspace_id, created_at
            FROM clients
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await?;

        Ok(clients)
    }
}
