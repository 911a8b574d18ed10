/// User model and database operations
///
/// A user (principal) belongs to exactly one workspace for its whole lifetime.
/// Emails are unique across the whole system and stored lowercase.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('OWNER', 'STAFF');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(320) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'STAFF',
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgExecutor, PgPool};
use std::fmt;
use uuid::Uuid;

/// Roles a user can hold inside its workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full control, including workspace administration
    Owner,

    /// Create and read; no workspace administration
    Staff,
}

impl UserRole {
    /// Converts role to its wire/database spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "OWNER",
            UserRole::Staff => "STAFF",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
///
/// `password_hash` is an Argon2id PHC string. It is never serialized and is
/// redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Lowercased email address
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Role inside the workspace
    pub role: UserRole,

    /// Owning workspace (immutable)
    pub workspace_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("workspace_id", &self.workspace_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Input for creating a new user
///
/// Only the store builds this; the workspace comes from registration or from
/// the caller's tenant scope.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address, already lowercased
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Role to assign
    pub role: UserRole,

    /// Workspace to bind to
    pub workspace_id: Uuid,
}

/// Workspace member as listed on the workspace page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for Member {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl User {
    /// Inserts a user
    ///
    /// Generic over the executor so registration can run it inside its transaction.
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` when the email is taken
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role, workspace_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, role, workspace_id, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .bind(data.workspace_id)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (expects a lowercased address)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, workspace_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists the members of a workspace, newest first
    pub async fn list_members(pool: &PgPool, workspace_id: Uuid) -> Result<Vec<Member>, sqlx::Error> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
