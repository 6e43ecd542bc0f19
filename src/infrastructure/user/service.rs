//! Account service: registration, credential verification and lookup

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::auth::{SecretProvider, TokenClaims, TokenIssuer};
use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

pub const EMAIL_TAKEN: &str = "an account with this email already exists";
pub const NO_MATCHING_ACCOUNT: &str = "no matching account";
pub const CREDENTIALS_MISMATCH: &str = "credentials mismatch";
pub const INVALID_TOKEN: &str = "invalid token";

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// A signed token together with the account it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub user: User,
    /// The `exp` claim carried by `token`
    pub expires_at: DateTime<Utc>,
}

/// Token settings for the account service
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Key under which the signing secret is looked up
    pub secret_key_name: String,
    /// Token lifetime in hours
    pub token_ttl_hours: u64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            secret_key_name: "SECRET_KEY".to_string(),
            token_ttl_hours: 24,
        }
    }
}

/// Account service over explicit collaborators
pub struct AccountService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    secrets: Arc<dyn SecretProvider>,
    config: AccountConfig,
}

impl Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("repository", &self.repository)
            .field("hasher", &self.hasher)
            .field("secrets", &self.secrets.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl AccountService {
    /// Create a new account service with default token settings
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        secrets: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            repository,
            hasher,
            tokens,
            secrets,
            config: AccountConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AccountConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a new account
    pub async fn register(&self, request: RegisterRequest) -> Result<(), DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }

        let password_hash = self.hash_password(request.password).await?;
        let new_user = NewUser::new(request.email, request.username, password_hash);

        let user = self.repository.save(new_user).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(EMAIL_TAKEN),
            other => other,
        })?;

        info!(user_id = %user.id(), "Registered account");
        Ok(())
    }

    /// Check an email/password pair and issue a signed token for the account
    pub async fn verify_and_issue_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, DomainError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found(NO_MATCHING_ACCOUNT))?;

        if !self.password_matches(password, user.password_hash()).await? {
            warn!(user_id = %user.id(), "Password mismatch");
            return Err(DomainError::invalid_credentials(CREDENTIALS_MISMATCH));
        }

        let secret = self.signing_secret()?;
        let claims = TokenClaims::for_user(&user, self.config.token_ttl_hours);
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| DomainError::internal("Token expiry is out of range"))?;
        let token = self.tokens.sign(&claims, &secret).await?;

        info!(user_id = %user.id(), "Issued token");
        Ok(IssuedToken {
            token,
            user,
            expires_at,
        })
    }

    /// Look up an account by its identifier
    pub async fn find_user_by_id(&self, id: &str) -> Result<User, DomainError> {
        debug!(user_id = %id, "Looking up account");

        // A malformed id cannot belong to any stored account
        let Ok(user_id) = UserId::new(id) else {
            return Err(DomainError::not_found(NO_MATCHING_ACCOUNT));
        };

        self.repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(NO_MATCHING_ACCOUNT))
    }

    /// Resolve the account a bearer token was issued for
    pub async fn authenticate_token(&self, token: &str) -> Result<User, DomainError> {
        let secret = self.signing_secret()?;

        let claims = self.tokens.verify(token, &secret).await.map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::invalid_credentials(INVALID_TOKEN)
        })?;

        self.find_user_by_id(claims.user_id()).await
    }

    /// Check that the store answers and a signing secret is available
    pub async fn check_ready(&self) -> Result<(), DomainError> {
        self.repository.find_by_email("readiness@probe.invalid").await?;
        self.signing_secret().map(|_| ())
    }

    fn signing_secret(&self) -> Result<String, DomainError> {
        self.secrets.get(&self.config.secret_key_name)
    }

    // Argon2 is CPU-bound; keep it off the async workers
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn password_matches(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password check task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::auth::{MockSecretProvider, MockTokenIssuer};
    use crate::infrastructure::auth::JwtTokenIssuer;
    use crate::infrastructure::secrets::EnvSecretProvider;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    const MOCK_USER_ID: &str = "c1f0e942-af78-4460-b3cc-4b0f6bfc1174";
    const MOCK_JWT: &str = "thisisjwt";
    const MOCK_SECRET: &str = "thisissecretkey";
    const PASSWORD: &str = "1205";

    fn mock_user() -> User {
        let hash = Argon2Hasher::new().hash(PASSWORD).unwrap();
        NewUser::new("me@amamov.com", "amamov", hash)
            .into_user(UserId::new(MOCK_USER_ID).unwrap(), Utc::now())
    }

    fn mock_secrets() -> MockSecretProvider {
        let mut secrets = MockSecretProvider::new();
        secrets.expect_get().returning(|_| Ok(MOCK_SECRET.to_string()));
        secrets.expect_provider_name().return_const("mock");
        secrets
    }

    fn create_service(user: &User, tokens: MockTokenIssuer) -> (AccountService, InMemoryUserRepository) {
        let repository = InMemoryUserRepository::with_users(vec![user.clone()]);
        let service = AccountService::new(
            Arc::new(repository.clone()),
            Arc::new(Argon2Hasher::new()),
            Arc::new(tokens),
            Arc::new(mock_secrets()),
        );
        (service, repository)
    }

    fn unused_issuer() -> MockTokenIssuer {
        let mut tokens = MockTokenIssuer::new();
        tokens.expect_sign().never();
        tokens
    }

    fn register_request(email: &str, password: &str, username: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_new_email() {
        let user = mock_user();
        let (service, repository) = create_service(&user, unused_issuer());

        let result = service
            .register(register_request("new@amamov.com", "1205", "new"))
            .await;

        assert!(matches!(result, Ok(())));
        assert_eq!(repository.len().await, 2);

        let stored = repository.find_by_email("new@amamov.com").await.unwrap().unwrap();
        assert_eq!(stored.username(), "new");
        assert!(!stored.is_admin());
        assert_ne!(stored.password_hash(), "1205");
        assert!(Argon2Hasher::new().verify("1205", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let user = mock_user();
        let (service, repository) = create_service(&user, unused_issuer());

        let result = service
            .register(register_request(user.email(), user.password_hash(), user.username()))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(err.message(), EMAIL_TAKEN);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_email_is_case_sensitive() {
        let user = mock_user();
        let (service, repository) = create_service(&user, unused_issuer());

        service
            .register(register_request("ME@amamov.com", "1205", "upper"))
            .await
            .unwrap();

        assert_eq!(repository.len().await, 2);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let user = mock_user();
        let (service, repository) = create_service(&user, unused_issuer());

        let bad_email = service.register(register_request("not-an-email", "1205", "new")).await;
        let empty_password = service.register(register_request("new@amamov.com", "", "new")).await;
        let empty_username = service.register(register_request("new@amamov.com", "1205", "")).await;

        assert!(matches!(bad_email, Err(DomainError::Validation { .. })));
        assert!(matches!(empty_password, Err(DomainError::Validation { .. })));
        assert!(matches!(empty_username, Err(DomainError::Validation { .. })));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_verify_unknown_email() {
        let user = mock_user();
        let (service, _) = create_service(&user, unused_issuer());

        let err = service
            .verify_and_issue_token("nothing@amamov.com", user.password_hash())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.message(), NO_MATCHING_ACCOUNT);
    }

    #[tokio::test]
    async fn test_verify_with_stored_hash_as_password() {
        let user = mock_user();
        let (service, _) = create_service(&user, unused_issuer());

        let err = service
            .verify_and_issue_token(user.email(), user.password_hash())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials { .. }));
        assert_eq!(err.message(), CREDENTIALS_MISMATCH);
    }

    #[tokio::test]
    async fn test_verify_wrong_password() {
        let user = mock_user();
        let (service, _) = create_service(&user, unused_issuer());

        let err = service
            .verify_and_issue_token(user.email(), "1205!")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials { .. }));
        assert_eq!(err.message(), CREDENTIALS_MISMATCH);
    }

    #[tokio::test]
    async fn test_verify_returns_token_and_user() {
        let user = mock_user();

        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_sign()
            .withf(|claims, secret| claims.sub == MOCK_USER_ID && secret == MOCK_SECRET)
            .times(1)
            .returning(|_, _| Ok(MOCK_JWT.to_string()));

        let (service, _) = create_service(&user, tokens);

        let before = Utc::now();
        let issued = service
            .verify_and_issue_token(user.email(), PASSWORD)
            .await
            .unwrap();

        assert_eq!(issued.token, MOCK_JWT);
        assert_eq!(issued.user, user);

        let ttl = issued.expires_at - before;
        assert!(ttl <= chrono::Duration::hours(24));
        assert!(ttl > chrono::Duration::hours(24) - chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_expires_at_matches_signed_claims() {
        let user = mock_user();
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::with_users(vec![user.clone()])),
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtTokenIssuer::new()),
            Arc::new(EnvSecretProvider::new().with_default("SECRET_KEY", MOCK_SECRET)),
        );

        let issued = service.verify_and_issue_token(user.email(), PASSWORD).await.unwrap();
        let claims = JwtTokenIssuer::new().verify(&issued.token, MOCK_SECRET).await.unwrap();

        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_logins() {
        let user = mock_user();

        let mut tokens = MockTokenIssuer::new();
        tokens.expect_sign().times(2).returning(|_, _| Ok(MOCK_JWT.to_string()));

        let (service, _) = create_service(&user, tokens);
        let service = Arc::new(service);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = Arc::clone(&service);
                let email = user.email().to_string();
                let password = if i % 2 == 0 { PASSWORD } else { "1205!" };
                tokio::spawn(async move {
                    let ok = service.verify_and_issue_token(&email, password).await.is_ok();
                    let registered = service
                        .register(register_request(&format!("user{}@amamov.com", i), "pw", "u"))
                        .await
                        .is_ok();
                    (ok, registered)
                })
            })
            .collect();

        let mut logins = 0;
        for handle in handles {
            let (ok, registered) = handle.await.unwrap();
            assert!(registered);
            if ok {
                logins += 1;
            }
        }

        assert_eq!(logins, 2);
    }

    #[tokio::test]
    async fn test_verify_looks_up_configured_secret_key() {
        let user = mock_user();

        let mut tokens = MockTokenIssuer::new();
        tokens.expect_sign().returning(|_, _| Ok(MOCK_JWT.to_string()));

        let mut secrets = MockSecretProvider::new();
        secrets
            .expect_get()
            .withf(|key| key == "JWT_SECRET")
            .times(1)
            .returning(|_| Ok(MOCK_SECRET.to_string()));

        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::with_users(vec![user.clone()])),
            Arc::new(Argon2Hasher::new()),
            Arc::new(tokens),
            Arc::new(secrets),
        )
        .with_config(AccountConfig {
            secret_key_name: "JWT_SECRET".to_string(),
            token_ttl_hours: 1,
        });

        let issued = service.verify_and_issue_token(user.email(), PASSWORD).await.unwrap();
        assert_eq!(issued.token, MOCK_JWT);
    }

    #[tokio::test]
    async fn test_verify_missing_secret_propagates() {
        let user = mock_user();

        let mut secrets = MockSecretProvider::new();
        secrets
            .expect_get()
            .returning(|key| Err(DomainError::configuration(format!("Secret '{}' is not set", key))));

        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::with_users(vec![user.clone()])),
            Arc::new(Argon2Hasher::new()),
            Arc::new(unused_issuer()),
            Arc::new(secrets),
        );

        let err = service.verify_and_issue_token(user.email(), PASSWORD).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_find_user_by_id() {
        let user = mock_user();
        let (service, _) = create_service(&user, unused_issuer());

        let found = service.find_user_by_id(MOCK_USER_ID).await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn test_find_user_by_unknown_id() {
        let user = mock_user();
        let (service, _) = create_service(&user, unused_issuer());

        let err = service.find_user_by_id("fakeid").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = service.find_user_by_id("not a valid id").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_token_round_trip() {
        let user = mock_user();
        let service = AccountService::new(
            Arc::new(InMemoryUserRepository::with_users(vec![user.clone()])),
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtTokenIssuer::new()),
            Arc::new(EnvSecretProvider::new().with_default("SECRET_KEY", MOCK_SECRET)),
        );

        let issued = service.verify_and_issue_token(user.email(), PASSWORD).await.unwrap();
        let authenticated = service.authenticate_token(&issued.token).await.unwrap();

        assert_eq!(authenticated, user);
    }

    #[tokio::test]
    async fn test_authenticate_token_rejected() {
        let user = mock_user();

        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_verify()
            .returning(|_, _| Err(DomainError::validation("Invalid JWT: bad signature")));

        let (service, _) = create_service(&user, tokens);

        let err = service.authenticate_token("garbage").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials { .. }));
        assert_eq!(err.message(), INVALID_TOKEN);
    }
}
