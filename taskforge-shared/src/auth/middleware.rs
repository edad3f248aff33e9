/// Authentication context and credential resolution
///
/// This module defines the authenticated-identity context attached to every
/// request after credential verification, and the resolution step that turns
/// a bearer token into that context.
///
/// Resolution verifies the token's signature and expiry, then looks the
/// subject up in the user store. A token whose subject no longer exists is
/// rejected; the context always reflects the current role and email, not
/// whatever was true when the token was minted.
///
/// # Request Extensions
///
/// After successful authentication the HTTP layer inserts an `AuthContext`
/// into request extensions; handlers extract it with Axum's `Extension`
/// extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskforge_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.email, auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::{User, UserRole};

/// Authenticated identity attached to request extensions
///
/// Carries exactly what downstream handlers need for authorization
/// decisions: id, email, and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// User's email address
    pub email: String,

    /// User's current role, freshly read from the store
    pub role: UserRole,
}

impl AuthContext {
    /// Builds a context from a user row
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }

    /// True when this identity carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for authentication
#[derive(Debug)]
pub enum AuthError {
    /// No credential presented
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token signature/expiry/issuer verification failed
    InvalidToken(String),

    /// Token was valid but its subject no longer exists
    UnknownSubject,

    /// Database error during subject lookup
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::UnknownSubject => {
                (StatusCode::UNAUTHORIZED, "Invalid credential").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Resolves a bearer credential to an authenticated identity
///
/// Steps:
/// 1. Validate the token (signature, expiry, issuer)
/// 2. Look the subject up in the user store
/// 3. Build an `AuthContext` from the current user row
///
/// # Errors
///
/// - `InvalidToken` when verification fails
/// - `UnknownSubject` when the subject has been deleted
/// - `DatabaseError` when the lookup itself fails
pub async fn resolve_bearer(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<AuthContext, AuthError> {
    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    let user = User::find_by_id(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("User lookup failed: {}", e)))?
        .ok_or(AuthError::UnknownSubject)?;

    Ok(AuthContext::from_user(&user))
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
///
/// # Errors
///
/// Returns `InvalidFormat` when the header doesn't carry a Bearer scheme
pub fn bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_context_from_user() {
        let user = sample_user(UserRole::User);
        let context = AuthContext::from_user(&user);

        assert_eq!(context.user_id, user.id);
        assert_eq!(context.email, "test@example.com");
        assert!(!context.is_admin());
    }

    #[test]
    fn test_auth_context_is_admin() {
        let admin = sample_user(UserRole::Admin);
        assert!(AuthContext::from_user(&admin).is_admin());
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");

        assert!(bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(bearer_token("abc.def.ghi").is_err());
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::UnknownSubject.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
