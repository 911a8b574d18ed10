/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id secret hashing and verification
/// - [`jwt`]: session token signing and offline verification
/// - [`middleware`]: tenant context resolution from the bearer token
/// - [`authorization`]: role gate and per-operation policy
///
/// # Example
///
/// ```no_run
/// use portal_shared::auth::password::{hash_password, verify_password};
/// use portal_shared::auth::jwt::{create_token, Claims};
/// use portal_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("secret123")?;
/// assert!(verify_password("secret123", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner);
/// let token = create_token(&claims, "test-secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
