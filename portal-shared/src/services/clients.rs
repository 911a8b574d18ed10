/// Client records of a workspace

use tracing::info;

use super::{normalize_email, optional_text, require_text};
use crate::auth::authorization::{authorize, Operation};
use crate::auth::middleware::AuthContext;
use crate::error::PortalResult;
use crate::models::client::{Client, NewClient};
use crate::store::{PortalStore, TenantScope};

pub async fn create_client(
    store: &dyn PortalStore,
    auth: &AuthContext,
    input: NewClient,
) -> PortalResult<Client> {
    authorize(auth, Operation::CreateClient)?;

    let input = NewClient {
        company_name: require_text("companyName", &input.company_name)?,
        contact_email: normalize_email("contactEmail", &input.contact_email)?,
        phone: optional_text(input.phone),
    };

    let client = store.create_client(&TenantScope::from(auth), input).await?;

    info!(
        workspace_id = %auth.workspace_id,
        client_id = %client.id,
        "Client created"
    );

    Ok(client)
}

/// Clients of the caller's workspace, newest first
pub async fn list_clients(store: &dyn PortalStore, auth: &AuthContext) -> PortalResult<Vec<Client>> {
    Ok(store.list_clients(&TenantScope::from(auth)).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::PortalError;
    use crate::services::test_support::{owner, staff};
    use crate::store::memory::MemoryStore;

    fn foo() -> NewClient {
        NewClient {
            company_name: " Foo ".to_string(),
            contact_email: "Hello@Foo.com".to_string(),
            phone: Some("".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_client_normalizes_input() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;

        let client = create_client(store.as_ref(), &acme, foo()).await.unwrap();

        assert_eq!(client.company_name, "Foo");
        assert_eq!(client.contact_email, "hello@foo.com");
        assert_eq!(client.phone, None);
        assert_eq!(client.workspace_id, acme.workspace_id);
    }

    #[tokio::test]
    async fn test_staff_may_create_clients() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;
        let sam = staff(&store, &acme, "s@acme.com").await;

        assert!(create_client(store.as_ref(), &sam, foo()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_contact_email_rejected() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;

        let mut input = foo();
        input.contact_email = "nope".to_string();

        assert!(matches!(
            create_client(store.as_ref(), &acme, input).await,
            Err(PortalError::ValidationFailure { ref field, .. }) if field == "contactEmail"
        ));
    }

    #[tokio::test]
    async fn test_list_clients_is_isolated() {
        let store = Arc::new(MemoryStore::new());
        let acme = owner(&store, "a@acme.com", "Acme").await;
        let beta = owner(&store, "b@beta.com", "Beta").await;

        create_client(store.as_ref(), &acme, foo()).await.unwrap();

        assert_eq!(list_clients(store.as_ref(), &acme).await.unwrap().len(), 1);
        assert!(list_clients(store.as_ref(), &beta).await.unwrap().is_empty());
    }
}
