/// JWT session token generation and validation
///
/// A session token is the only proof of identity the API accepts. It is signed
/// with HS256 and carries everything the tenant context needs, so verifying it
/// never touches the datastore.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: fixed 7 days from issue
/// - **Validation**: signature, expiration, not-before and issuer checks
/// - **Secret Management**: secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use portal_shared::auth::jwt::{create_token, validate_token, Claims};
/// use portal_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let workspace_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let claims = Claims::new(user_id, workspace_id, UserRole::Owner);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.role, UserRole::Owner);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Issuer stamped into every token
pub const ISSUER: &str = "client-portal";

/// Validity window of a session token
pub fn session_lifetime() -> Duration {
    Duration::days(7)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: principal (user) id
/// - `iss`: always [`ISSUER`]
/// - `iat` / `nbf` / `exp`: issue, not-before and expiry (Unix seconds)
///
/// # Custom Claims
///
/// - `workspace_id`: the principal's tenant
/// - `role`: the principal's role inside that tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Workspace the principal belongs to
    pub workspace_id: Uuid,

    /// Role inside the workspace
    pub role: UserRole,
}

impl Claims {
    /// Creates claims valid for the standard session lifetime
    pub fn new(user_id: Uuid, workspace_id: Uuid, role: UserRole) -> Self {
        Self::with_expiration(user_id, workspace_id, role, session_lifetime())
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration yields an already-expired token, which is handy in tests.
    ///
    /// # Example
    ///
    /// ```
    /// use portal_shared::auth::jwt::Claims;
    /// use portal_shared::models::user::UserRole;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(
    ///     Uuid::new_v4(),
    ///     Uuid::new_v4(),
    ///     UserRole::Staff,
    ///     Duration::hours(1),
    /// );
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(
        user_id: Uuid,
        workspace_id: Uuid,
        role: UserRole,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            workspace_id,
            role,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Token is not used before its nbf time
/// - Issuer is [`ISSUER`]
///
/// Purely cryptographic; no I/O.
///
/// # Errors
///
/// - `JwtError::Expired` for a signature-valid token past its `exp`
/// - `JwtError::InvalidIssuer` for a token minted by someone else
/// - `JwtError::InvalidFormat` for anything that is not a JWT
/// - `JwtError::ValidationError` for bad signatures and other failures
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    use jsonwebtoken::errors::ErrorKind;

    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
            JwtError::InvalidFormat(e.to_string())
        }
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let workspace_id = Uuid::new_v4();

        let claims = Claims::new(user_id, workspace_id, UserRole::Owner);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.workspace_id, workspace_id);
        assert_eq!(claims.role, UserRole::Owner);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UserRole::Staff,
            Duration::hours(1),
        );

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let workspace_id = Uuid::new_v4();

        let claims = Claims::new(user_id, workspace_id, UserRole::Staff);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.workspace_id, workspace_id);
        assert_eq!(validated.role, UserRole::Staff);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_role_serialized_uppercase() {
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["role"], "OWNER");
        assert!(json.get("workspace_id").is_some());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UserRole::Owner,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_foreign_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Owner);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::InvalidIssuer { .. })));
    }

    #[test]
    fn test_validate_garbage() {
        assert!(matches!(
            validate_token("not.a.jwt", SECRET),
            Err(JwtError::InvalidFormat(_))
        ));
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), UserRole::Staff);
        let token = create_token(&claims, SECRET).unwrap();

        // Swap the payload for one claiming OWNER, keep the original signature
        let forged = Claims {
            role: UserRole::Owner,
            ..claims
        };
        let forged_token = create_token(&forged, "attacker-secret-key-at-least-32-bytes").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(validate_token(&spliced, SECRET).is_err());
    }
}
