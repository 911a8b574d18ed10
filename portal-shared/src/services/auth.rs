/// Credential store operations
///
/// Registration, login and session tokens. Secrets are hashed with Argon2id on
/// tokio's blocking pool before any store call, and neither the secret nor its
/// hash is ever logged.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use portal_shared::services::auth::{AuthService, Registration};
/// use portal_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), portal_shared::error::PortalError> {
/// let auth = AuthService::new(
///     Arc::new(MemoryStore::new()),
///     "test-secret-key-at-least-32-bytes-long",
/// );
///
/// auth.register(Registration {
///     email: "a@acme.com".to_string(),
///     password: "secret123".to_string(),
///     name: "Alice".to_string(),
///     workspace_name: "Acme".to_string(),
/// })
/// .await?;
///
/// let session = auth.login("a@acme.com", "secret123").await?;
/// let context = auth.verify_token(&session.token)?;
/// assert_eq!(context.principal_id, session.user.id);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::{normalize_email, require_text};
use crate::auth::authorization::{authorize, Operation};
use crate::auth::jwt::{create_token, validate_token, Claims};
use crate::auth::middleware::AuthContext;
use crate::auth::password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking};
use crate::error::{PortalError, PortalResult};
use crate::models::user::{Member, User};
use crate::models::workspace::Workspace;
use crate::store::{NewMember, NewRegistration, PortalStore, TenantScope};

/// Shortest accepted secret, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub workspace_name: String,
}

/// Input for adding a member to the caller's workspace
#[derive(Debug, Clone)]
pub struct MemberInvite {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Signed token plus the user it was issued to
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Registration, login and session handling
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn PortalStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn PortalStore>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Creates a workspace and its OWNER
    ///
    /// # Errors
    ///
    /// - `ValidationFailure` for a blank field, malformed email or short secret
    /// - `Conflict` if the email is already registered
    pub async fn register(&self, registration: Registration) -> PortalResult<(Workspace, User)> {
        let email = normalize_email("email", &registration.email)?;
        let name = require_text("name", &registration.name)?;
        let workspace_name = require_text("workspaceName", &registration.workspace_name)?;
        check_password(&registration.password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(PortalError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password_blocking(registration.password).await?;

        let (workspace, user) = self
            .store
            .register_workspace(NewRegistration {
                email,
                password_hash,
                name,
                workspace_name,
            })
            .await?;

        info!(
            workspace_id = %workspace.id,
            user_id = %user.id,
            "Workspace registered"
        );

        Ok((workspace, user))
    }

    /// Checks an email and secret pair
    ///
    /// Unknown email and wrong secret both return `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> PortalResult<User> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            verify_dummy_blocking(password.to_string()).await;
            debug!("Login failed: unknown email");
            return Err(PortalError::InvalidCredentials);
        };

        let matches = verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(PortalError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Signs a session token for `user`
    pub fn issue_token(&self, user: &User) -> PortalResult<String> {
        let claims = Claims::new(user.id, user.workspace_id, user.role);
        Ok(create_token(&claims, &self.jwt_secret)?)
    }

    /// Verifies a session token without touching the store
    pub fn verify_token(&self, token: &str) -> PortalResult<AuthContext> {
        let claims = validate_token(token, &self.jwt_secret)?;
        Ok(AuthContext::from(claims))
    }

    /// Authenticates and issues a token in one step
    pub async fn login(&self, email: &str, password: &str) -> PortalResult<Session> {
        let user = self.authenticate(email, password).await?;
        let token = self.issue_token(&user)?;

        info!(user_id = %user.id, workspace_id = %user.workspace_id, "User logged in");

        Ok(Session { token, user })
    }

    /// Registers and issues a token for the new OWNER
    pub async fn register_session(&self, registration: Registration) -> PortalResult<Session> {
        let (_, user) = self.register(registration).await?;
        let token = self.issue_token(&user)?;
        Ok(Session { token, user })
    }

    /// Adds a STAFF user to the caller's workspace (OWNER only)
    pub async fn add_member(&self, auth: &AuthContext, invite: MemberInvite) -> PortalResult<Member> {
        authorize(auth, Operation::AddMember)?;

        let email = normalize_email("email", &invite.email)?;
        let name = require_text("name", &invite.name)?;
        check_password(&invite.password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(PortalError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password_blocking(invite.password).await?;
        let user = self
            .store
            .add_member(
                &TenantScope::from(auth),
                NewMember {
                    email,
                    password_hash,
                    name,
                },
            )
            .await?;

        info!(
            workspace_id = %auth.workspace_id,
            user_id = %user.id,
            added_by = %auth.principal_id,
            "Member added"
        );

        Ok(Member::from(&user))
    }
}

fn check_password(password: &str) -> PortalResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PortalError::invalid(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}
