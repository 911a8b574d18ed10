/// Tenant context resolution for Axum
///
/// This is the only place identity is established. The resolver reads the
/// `Authorization: Bearer <token>` header, verifies the session token offline
/// and attaches an [`AuthContext`] to the request extensions. Downstream code
/// takes the context from there and never re-derives identity or tenant.
///
/// # Example
///
/// ```no_run
/// use axum::{extract::Request, middleware::Next, response::{IntoResponse, Response}};
/// use portal_shared::auth::middleware::resolve_context;
///
/// async fn require_session(secret: String, mut req: Request, next: Next) -> Response {
///     match resolve_context(req.headers(), &secret) {
///         Ok(context) => {
///             req.extensions_mut().insert(context);
///             next.run(req).await
///         }
///         Err(e) => e.into_response(),
///     }
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Resolved identity of the caller
///
/// Built from verified token claims. Handlers extract it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    /// Authenticated user
    pub principal_id: Uuid,

    /// The user's workspace
    pub workspace_id: Uuid,

    /// The user's role in that workspace
    pub role: UserRole,
}

impl AuthContext {
    /// Creates an auth context
    pub fn new(principal_id: Uuid, workspace_id: Uuid, role: UserRole) -> Self {
        Self {
            principal_id,
            workspace_id,
            role,
        }
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, claims.workspace_id, claims.role)
    }
}

/// Error type for the tenant context resolver
///
/// Every variant means "unauthenticated"; they differ only in the message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed verification
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            _ => AuthError::InvalidToken("Invalid token".to_string()),
        }
    }
}

/// Extracts the bearer token from request headers
///
/// The scheme is matched case-sensitively as `Bearer ` and the token must be non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid ASCII".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Resolves the caller's context from request headers
///
/// Never touches the datastore.
pub fn resolve_context(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    Ok(AuthContext::from(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_resolve_valid_token() {
        let user_id = Uuid::new_v4();
        let workspace_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id, workspace_id, UserRole::Staff), SECRET).unwrap();

        let context = resolve_context(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();

        assert_eq!(context, AuthContext::new(user_id, workspace_id, UserRole::Staff));
    }

    #[test]
    fn test_missing_header() {
        let result = resolve_context(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_malformed_header() {
        assert!(matches!(
            bearer_token(&headers_with("Token abc")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("bearer abc")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UserRole::Owner,
            Duration::seconds(-3600),
        );
        let token = create_token(&claims, SECRET).unwrap();

        let result = resolve_context(&headers_with(&format!("Bearer {}", token)), SECRET);
        match result {
            Err(AuthError::InvalidToken(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected expired token error, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_error_into_response() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("x".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }
}
