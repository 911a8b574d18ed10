/// Workspace details and settings

use tracing::info;

use super::{optional_text, require_text};
use crate::auth::authorization::{authorize, Operation};
use crate::auth::middleware::AuthContext;
use crate::error::{PortalError, PortalResult};
use crate::models::workspace::{UpdateWorkspace, Workspace, WorkspaceDetails};
use crate::store::{PortalStore, TenantScope};

/// Longest accepted logo URL, in characters (`workspaces.logo_url`)
pub const MAX_LOGO_URL_LENGTH: usize = 1024;

/// The caller's workspace with its member list
pub async fn get_workspace(store: &dyn PortalStore, auth: &AuthContext) -> PortalResult<WorkspaceDetails> {
    let scope = TenantScope::from(auth);

    let workspace = store
        .get_workspace(&scope)
        .await?
        .ok_or_else(|| PortalError::NotFound("Workspace not found".to_string()))?;
    let users = store.list_members(&scope).await?;

    Ok(WorkspaceDetails { workspace, users })
}

/// Renames the workspace or changes its logo (OWNER only)
///
/// A blank `logoUrl` clears the logo. An empty change set returns the
/// workspace unchanged. URLs longer than [`MAX_LOGO_URL_LENGTH`] are a
/// validation failure.
pub async fn update_workspace(
    store: &dyn PortalStore,
    auth: &AuthContext,
    changes: UpdateWorkspace,
) -> PortalResult<Workspace> {
    authorize(auth, Operation::UpdateWorkspace)?;
    let scope = TenantScope::from(auth);

    let changes = UpdateWorkspace {
        name: changes.name.map(|n| require_text("name", &n)).transpose()?,
        logo_url: changes.logo_url.map(optional_text),
    };

    if let Some(Some(url)) = &changes.logo_url {
        if url.chars().count() > MAX_LOGO_URL_LENGTH {
            return Err(PortalError::invalid(
                "logoUrl",
                format!("Logo URL must be at most {} characters", MAX_LOGO_URL_LENGTH),
            ));
        }
    }

    let updated = if changes.is_empty() {
        store.get_workspace(&scope).await?
    } else {
        store.update_workspace(&scope, changes).await?
    };

    let workspace = updated.ok_or_else(|| PortalError::NotFound("Workspace not found".to_string()))?;

    info!(workspace_id = %workspace.id, updated_by = %auth.principal_id, "Workspace updated");

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::user::UserRole;
    use crate::services::test_support::{owner, staff, stranger};
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_get_workspace_lists_members() {
        let store = Arc::new(MemoryStore::new());
        let owner_ctx = owner(&store, "o@acme.com", "Acme").await;
        staff(&store, &owner_ctx, "s@acme.com").await;
        owner(&store, "b@beta.com", "Beta").await;

        let details = get_workspace(store.as_ref(), &owner_ctx).await.unwrap();

        assert_eq!(details.workspace.name, "Acme");
        assert_eq!(details.users.len(), 2);
        assert_eq!(details.users[0].role, UserRole::Staff);
        assert!(details.users.iter().all(|u| u.email.ends_with("@acme.com")));
    }

    #[tokio::test]
    async fn test_staff_cannot_update_workspace() {
        let store = Arc::new(MemoryStore::new());
        let owner_ctx = owner(&store, "o@acme.com", "Acme").await;
        let staff_ctx = staff(&store, &owner_ctx, "s@acme.com").await;

        let rename = UpdateWorkspace {
            name: Some("Acme Inc".to_string()),
            logo_url: None,
        };

        assert!(matches!(
            update_workspace(store.as_ref(), &staff_ctx, rename.clone()).await,
            Err(PortalError::Forbidden(_))
        ));

        let updated = update_workspace(store.as_ref(), &owner_ctx, rename).await.unwrap();
        assert_eq!(updated.name, "Acme Inc");
    }

    #[tokio::test]
    async fn test_blank_logo_clears_it() {
        let store = Arc::new(MemoryStore::new());
        let owner_ctx = owner(&store, "o@acme.com", "Acme").await;

        let with_logo = update_workspace(
            store.as_ref(),
            &owner_ctx,
            UpdateWorkspace {
                name: None,
                logo_url: Some(Some("https://acme.com/logo.png".to_string())),
            },
        )
        .await
        .unwrap();
        assert!(with_logo.logo_url.is_some());

        let cleared = update_workspace(
            store.as_ref(),
            &owner_ctx,
            UpdateWorkspace {
                name: None,
                logo_url: Some(Some("  ".to_string())),
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.logo_url, None);
        assert_eq!(cleared.name, "Acme");
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_logo_url() {
        let store = Arc::new(MemoryStore::new());
        let owner_ctx = owner(&store, "o@acme.com", "Acme").await;

        let long_url = format!("https://cdn.example.com/{}", "a".repeat(2000));
        let result = update_workspace(
            store.as_ref(),
            &owner_ctx,
            UpdateWorkspace {
                name: None,
                logo_url: Some(Some(long_url)),
            },
        )
        .await;

        match result {
            Err(PortalError::ValidationFailure { field, .. }) => assert_eq!(field, "logoUrl"),
            other => panic!("expected validation failure, got {:?}", other),
        }

        let at_limit = format!("https://{}", "a".repeat(MAX_LOGO_URL_LENGTH - "https://".len()));
        let updated = update_workspace(
            store.as_ref(),
            &owner_ctx,
            UpdateWorkspace {
                name: None,
                logo_url: Some(Some(at_limit.clone())),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.logo_url, Some(at_limit));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let store = Arc::new(MemoryStore::new());
        let owner_ctx = owner(&store, "o@acme.com", "Acme").await;

        let result = update_workspace(
            store.as_ref(),
            &owner_ctx,
            UpdateWorkspace {
                name: Some(" ".to_string()),
                logo_url: None,
            },
        )
        .await;
        assert!(matches!(result, Err(PortalError::ValidationFailure { .. })));
    }

    #[tokio::test]
    async fn test_missing_workspace_is_not_found() {
        let store = Arc::new(MemoryStore::new());

        assert!(matches!(
            get_workspace(store.as_ref(), &stranger()).await,
            Err(PortalError::NotFound(_))
        ));
        assert!(matches!(
            update_workspace(store.as_ref(), &stranger(), UpdateWorkspace::default()).await,
            Err(PortalError::NotFound(_))
        ));
    }
}
