//! Admin authorization.
//!
//! Admin routes take an [`AdminGuard`] argument. The guard reads the bearer
//! token from the `Authorization` header and asks the configured
//! [`Authorizer`]; a rejected request never reaches the handler.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use crate::domain::KennelError;
use crate::AppState;

/// Decides whether a caller may use admin routes
pub trait Authorizer: Send + Sync {
    fn authorize(&self, token: Option<&str>) -> bool;
}

/// Accepts exactly one shared bearer token. With no token configured every
/// request is rejected.
pub struct TokenAuthorizer {
    admin_token: Option<String>,
}

impl TokenAuthorizer {
    pub fn new(admin_token: Option<String>) -> Self {
        let admin_token = admin_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { admin_token }
    }
}

impl Authorizer for TokenAuthorizer {
    fn authorize(&self, token: Option<&str>) -> bool {
        match (self.admin_token.as_deref(), token) {
            (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
            _ => false,
        }
    }
}

/// Byte comparison whose running time depends only on the input lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

/// Proof that the request carried a valid admin token
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = KennelError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state.authorizer.authorize(bearer_token(parts)) {
            Ok(AdminGuard)
        } else {
            warn!("Rejected unauthorized {} {}", parts.method, parts.uri);
            Err(KennelError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_token_authorizer() {
        let auth = TokenAuthorizer::new(Some("s3cret".to_string()));
        assert!(auth.authorize(Some("s3cret")));
        assert!(!auth.authorize(Some("guess")));
        assert!(!auth.authorize(None));

        let closed = TokenAuthorizer::new(Some("   ".to_string()));
        assert!(!closed.authorize(Some("")));
        assert!(!TokenAuthorizer::new(None).authorize(Some("anything")));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"s3cret", b"s3cret-longer"));
        assert!(!constant_time_eq(b"s3cret", b"s3cre"));
        assert!(!constant_time_eq(b"s3cret\0", b"s3cret"));

        let auth = TokenAuthorizer::new(Some("s3cret".to_string()));
        assert!(!auth.authorize(Some("s3cre")));
        assert!(!auth.authorize(Some("s3crets")));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let (parts, _) = Request::builder()
            .header("Authorization", "Bearer abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc123"));

        let (parts, _) = Request::builder()
            .header("Authorization", "Basic abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
