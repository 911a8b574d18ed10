/// Role-based authorization gate
///
/// Every mutating operation declares the roles allowed to run it through
/// [`Operation::allowed_roles`]. Reads are open to any authenticated caller
/// and have no entry here.
///
/// # Policy
///
/// | Operation | Allowed roles |
/// |---|---|
/// | create client | OWNER, STAFF |
/// | create project | OWNER, STAFF |
/// | create task | OWNER, STAFF |
/// | update task status | OWNER, STAFF |
/// | add comment | OWNER, STAFF |
/// | update workspace | OWNER |
/// | add workspace member | OWNER |
///
/// # Example
///
/// ```
/// use portal_shared::auth::authorization::{authorize, Operation};
/// use portal_shared::auth::middleware::AuthContext;
/// use portal_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let staff = AuthContext::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Staff);
///
/// assert!(authorize(&staff, Operation::CreateClient).is_ok());
/// assert!(authorize(&staff, Operation::UpdateWorkspace).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not in the allowed set
    #[error("Insufficient permissions: requires one of {allowed:?}, has {actual:?}")]
    InsufficientRole {
        allowed: Vec<UserRole>,
        actual: UserRole,
    },
}

const OWNER_OR_STAFF: &[UserRole] = &[UserRole::Owner, UserRole::Staff];
const OWNER_ONLY: &[UserRole] = &[UserRole::Owner];

/// Mutating operations subject to a role check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateClient,
    CreateProject,
    CreateTask,
    UpdateTaskStatus,
    CreateComment,
    UpdateWorkspace,
    AddMember,
}

impl Operation {
    /// Roles allowed to perform this operation
    pub fn allowed_roles(&self) -> &'static [UserRole] {
        match self {
            Operation::CreateClient
            | Operation::CreateProject
            | Operation::CreateTask
            | Operation::UpdateTaskStatus
            | Operation::CreateComment => OWNER_OR_STAFF,
            Operation::UpdateWorkspace | Operation::AddMember => OWNER_ONLY,
        }
    }
}

/// Checks the caller's role against an allowed set
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` if `auth.role` is not in `allowed`
pub fn require_role(auth: &AuthContext, allowed: &[UserRole]) -> Result<(), AuthzError> {
    if allowed.contains(&auth.role) {
        return Ok(());
    }

    tracing::debug!(
        principal_id = %auth.principal_id,
        role = %auth.role,
        "Role check failed"
    );

    Err(AuthzError::InsufficientRole {
        allowed: allowed.to_vec(),
        actual: auth.role,
    })
}

/// Checks the caller may perform `operation`
pub fn authorize(auth: &AuthContext, operation: Operation) -> Result<(), AuthzError> {
    require_role(auth, operation.allowed_roles())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn context(role: UserRole) -> AuthContext {
        AuthContext::new(Uuid::new_v4(), Uuid::new_v4(), role)
    }

    #[test]
    fn test_owner_may_do_everything() {
        let owner = context(UserRole::Owner);
        for op in [
            Operation::CreateClient,
            Operation::CreateProject,
            Operation::CreateTask,
            Operation::UpdateTaskStatus,
            Operation::CreateComment,
            Operation::UpdateWorkspace,
            Operation::AddMember,
        ] {
            assert!(authorize(&owner, op).is_ok(), "owner denied {:?}", op);
        }
    }

    #[test]
    fn test_staff_cannot_administer_workspace() {
        let staff = context(UserRole::Staff);

        assert!(authorize(&staff, Operation::CreateProject).is_ok());
        assert!(authorize(&staff, Operation::UpdateTaskStatus).is_ok());
        assert!(matches!(
            authorize(&staff, Operation::UpdateWorkspace),
            Err(AuthzError::InsufficientRole { actual: UserRole::Staff, .. })
        ));
        assert!(authorize(&staff, Operation::AddMember).is_err());
    }

    #[test]
    fn test_require_role_empty_set_denies() {
        assert!(require_role(&context(UserRole::Owner), &[]).is_err());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::InsufficientRole {
            allowed: vec![UserRole::Owner],
            actual: UserRole::Staff,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient permissions: requires one of [Owner], has Staff"
        );
    }
}
