//! Token claims and the token issuer seam

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a user, valid for the given number of hours
    pub fn for_user(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours as i64);

        Self {
            sub: user.id().as_str().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
            is_admin: user.is_admin(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Produces and checks signed tokens.
///
/// The signing secret is supplied per call; implementations hold no key
/// material of their own.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Sign the claims into a token
    async fn sign(&self, claims: &TokenClaims, secret: &str) -> Result<String, DomainError>;

    /// Check a token's signature and expiry and return its claims
    async fn verify(&self, token: &str, secret: &str) -> Result<TokenClaims, DomainError>;
}
