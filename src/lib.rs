//! Accounts API
//!
//! User registration, credential verification with token issuance, and
//! account lookup, over pluggable storage (in-memory or PostgreSQL).

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use api::state::AppState;
use config::StorageBackend;
use domain::auth::SecretProvider;
use domain::user::UserRepository;
use infrastructure::{
    auth::JwtTokenIssuer,
    secrets::EnvSecretProvider,
    user::{AccountConfig, AccountService, Argon2Hasher, InMemoryUserRepository, PostgresUserRepository},
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = create_user_repository(config).await?;

    let secrets = EnvSecretProvider::new().with_defaults(config.auth.secrets.clone());

    if secrets.get(&config.auth.secret_key_name).is_err() {
        warn!(
            "Signing secret '{}' is not set; logins will fail until it is provided",
            config.auth.secret_key_name
        );
    }

    let account_service = AccountService::new(
        repository,
        Arc::new(Argon2Hasher::new()),
        Arc::new(JwtTokenIssuer::new()),
        Arc::new(secrets),
    )
    .with_config(AccountConfig {
        secret_key_name: config.auth.secret_key_name.clone(),
        token_ttl_hours: config.auth.token_ttl_hours,
    });

    Ok(AppState::new(account_service))
}

async fn create_user_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    info!("Storage backend: {:?}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryUserRepository::new())),
        StorageBackend::Postgres => {
            let database_url = config
                .storage
                .resolve_database_url()
                .context("storage.database_url or DATABASE_URL is required for the postgres backend")?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            info!("PostgreSQL connection established");

            let repository = PostgresUserRepository::new(pool);
            repository.migrate().await?;

            Ok(Arc::new(repository))
        }
    }
}
