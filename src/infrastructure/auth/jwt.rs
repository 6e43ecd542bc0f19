//! JWT token signing and validation

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::auth::{TokenClaims, TokenIssuer};
use crate::domain::DomainError;

/// HMAC-signed JWT issuer.
///
/// The secret arrives with every call, so a rotated secret takes effect on
/// the next request.
#[derive(Debug, Clone)]
pub struct JwtTokenIssuer {
    algorithm: Algorithm,
}

impl JwtTokenIssuer {
    /// Create an issuer using HS256
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::HS256,
        }
    }

    /// Create an issuer for another HMAC algorithm
    pub fn with_algorithm(algorithm: Algorithm) -> Result<Self, DomainError> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self { algorithm }),
            other => Err(DomainError::configuration(format!(
                "Unsupported JWT algorithm: {:?}. Use HS256, HS384 or HS512.",
                other
            ))),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Default for JwtTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

fn require_secret(secret: &str) -> Result<&[u8], DomainError> {
    if secret.is_empty() {
        return Err(DomainError::configuration("JWT signing secret is empty"));
    }
    Ok(secret.as_bytes())
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    async fn sign(&self, claims: &TokenClaims, secret: &str) -> Result<String, DomainError> {
        let key = EncodingKey::from_secret(require_secret(secret)?);

        encode(&Header::new(self.algorithm), claims, &key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    async fn verify(&self, token: &str, secret: &str) -> Result<TokenClaims, DomainError> {
        let key = DecodingKey::from_secret(require_secret(secret)?);
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<TokenClaims>(token, &key, &validation)
            .map_err(|e| DomainError::invalid_credentials(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }
}
