use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of signing secrets and other sensitive configuration values
#[cfg_attr(test, automock)]
pub trait SecretProvider: Send + Sync {
    /// Get the secret stored under `key`
    fn get(&self, key: &str) -> Result<String, DomainError>;

    /// Get provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}
