/// Error taxonomy for the portal core
///
/// Every operation in [`crate::services`] returns one of these kinds instead of a
/// raw persistence or crypto error. The HTTP layer maps each kind to a status
/// code and a stable `error` tag; the underlying cause is logged for operators
/// and never carried in the variant payload.
///
/// | Kind | Meaning |
/// |---|---|
/// | `Conflict` | duplicate unique key on create (e.g. email already registered) |
/// | `InvalidCredentials` | login failed; unknown email and wrong secret look the same |
/// | `Unauthenticated` | missing, malformed, expired or otherwise invalid token |
/// | `Forbidden` | authenticated, but the role may not perform the operation |
/// | `NotFound` | absent, or owned by another workspace |
/// | `ValidationFailure` | missing or malformed input |
/// | `Unavailable` | the datastore cannot be reached |
/// | `Internal` | anything else that went wrong on our side |

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias used across the core
pub type PortalResult<T> = Result<T, PortalError>;

/// Core error kinds
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Duplicate unique key on create
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication failed
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Role lacks the capability
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity absent or owned by another workspace
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input
    #[error("Validation failed on `{field}`: {message}")]
    ValidationFailure { field: String, message: String },

    /// Datastore unreachable
    #[error("Service unavailable")]
    Unavailable,

    /// Unexpected internal failure
    #[error("Internal error")]
    Internal,
}

impl PortalError {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        PortalError::ValidationFailure {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable tag for this kind
    pub fn kind(&self) -> &'static str {
        match self {
            PortalError::Conflict(_) => "conflict",
            PortalError::InvalidCredentials => "invalid_credentials",
            PortalError::Unauthenticated(_) => "unauthorized",
            PortalError::Forbidden(_) => "forbidden",
            PortalError::NotFound(_) => "not_found",
            PortalError::ValidationFailure { .. } => "validation_error",
            PortalError::Unavailable => "service_unavailable",
            PortalError::Internal => "internal_error",
        }
    }
}

impl From<StoreError> for PortalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(what) => PortalError::Conflict(what),
            StoreError::Unavailable(cause) => {
                tracing::error!(error = %cause, "Datastore unavailable");
                PortalError::Unavailable
            }
            StoreError::Backend(cause) => {
                tracing::error!(error = %cause, "Datastore operation failed");
                PortalError::Internal
            }
        }
    }
}

impl From<AuthzError> for PortalError {
    fn from(err: AuthzError) -> Self {
        PortalError::Forbidden(err.to_string())
    }
}

impl From<JwtError> for PortalError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(cause) => {
                tracing::error!(error = %cause, "Failed to sign session token");
                PortalError::Internal
            }
            JwtError::Expired => PortalError::Unauthenticated("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                PortalError::Unauthenticated("Invalid token issuer".to_string())
            }
            JwtError::ValidationError(_) | JwtError::InvalidFormat(_) => {
                PortalError::Unauthenticated("Invalid token".to_string())
            }
        }
    }
}

impl From<PasswordError> for PortalError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password hashing failed");
        PortalError::Internal
    }
}
