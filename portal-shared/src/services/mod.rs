/// Entity lifecycle operations
///
/// Each operation runs the same pipeline: role gate, then a call into the
/// tenant-scoped store with a [`TenantScope`](crate::store::TenantScope)
/// derived from the caller, then shaping of the result. Lookups that come back
/// empty become [`PortalError::NotFound`].
///
/// - [`auth`]: registration, login, session tokens, members
/// - [`workspace`]: workspace details and settings
/// - [`clients`], [`projects`], [`tasks`]: the workspace's portfolio

pub mod auth;
pub mod clients;
pub mod projects;
pub mod tasks;
pub mod workspace;

use crate::error::{PortalError, PortalResult};

/// Trims `value` and rejects it if nothing is left
pub(crate) fn require_text(field: &str, value: &str) -> PortalResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortalError::invalid(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value, mapping blank to `None`
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercases and trims an email address, checking its basic shape
pub(crate) fn normalize_email(field: &str, email: &str) -> PortalResult<String> {
    let email = email.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(PortalError::invalid(field, "must be a valid email address"));
    }
    Ok(email)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::auth::middleware::AuthContext;
    use crate::models::user::UserRole;
    use crate::store::{memory::MemoryStore, NewMember, NewRegistration, PortalStore, TenantScope};

    /// Registers a workspace directly in the store and returns the owner's context
    pub async fn owner(store: &Arc<MemoryStore>, email: &str, workspace: &str) -> AuthContext {
        let (workspace, user) = store
            .register_workspace(NewRegistration {
                email: email.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                name: "Owner".to_string(),
                workspace_name: workspace.to_string(),
            })
            .await
            .unwrap();
        AuthContext::new(user.id, workspace.id, UserRole::Owner)
    }

    /// Adds a STAFF user to the owner's workspace and returns its context
    pub async fn staff(store: &Arc<MemoryStore>, owner: &AuthContext, email: &str) -> AuthContext {
        let user = store
            .add_member(
                &TenantScope::from(owner),
                NewMember {
                    email: email.to_string(),
                    password_hash: "$argon2id$stub".to_string(),
                    name: "Staff".to_string(),
                },
            )
            .await
            .unwrap();
        AuthContext::new(user.id, owner.workspace_id, UserRole::Staff)
    }

    /// A context for a workspace that does not exist
    pub fn stranger() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner)
    }
}
