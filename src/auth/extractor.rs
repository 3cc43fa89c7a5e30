//! AuthUser extractor for Axum handlers.
//!
//! Extracts the authenticated user's identity from request extensions
//! (populated by the `require_auth` middleware).

use crate::api::AppError;
use crate::auth::jwt::Claims;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Authenticated user identity extracted from JWT claims.
///
/// Use this as a handler parameter to require authentication and access the
/// acting principal's identity. The id feeds task authorship and the
/// task-delete ownership check; it never comes from request payload fields.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

impl AuthUser {
    /// Create from JWT claims
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
                AppError::Unauthorized("Authentication required — no claims in request".to_string())
            })?;

            Self::from_claims(claims)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_from_valid_claims() {
        let claims = Claims {
            sub: "42".to_string(),
            email: "alice@example.com".to_string(),
            iat: 0,
            exp: 0,
        };

        let user = AuthUser::from_claims(&claims).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_auth_user_from_invalid_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "alice@example.com".to_string(),
            iat: 0,
            exp: 0,
        };

        let result = AuthUser::from_claims(&claims);
        assert!(result.is_err());
    }
}
