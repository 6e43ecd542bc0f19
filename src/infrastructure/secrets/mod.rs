//! Secret providers

mod env_provider;

pub use env_provider::EnvSecretProvider;
