use std::collections::HashMap;
use std::env;

use crate::domain::auth::SecretProvider;
use crate::domain::DomainError;

/// Secret provider that reads environment variables, falling back to
/// configured defaults
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider {
    defaults: HashMap<String, String>,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value used when the environment does not define `key`
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn with_defaults(mut self, defaults: HashMap<String, String>) -> Self {
        self.defaults.extend(defaults);
        self
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get(&self, key: &str) -> Result<String, DomainError> {
        if let Ok(value) = env::var(key) {
            if !value.is_empty() {
                return Ok(value);
            }
        }

        self.defaults.get(key).cloned().ok_or_else(|| {
            DomainError::configuration(format!(
                "Secret '{}' is not set in the environment or configuration",
                key
            ))
        })
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}
