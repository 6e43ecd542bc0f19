//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserLookup, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    /// email -> user ID
    email_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with already-stored users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut tables = Tables::default();

        for user in users {
            let id = user.id().as_str().to_string();
            tables.email_index.insert(user.email().to_string(), id.clone());
            tables.users.insert(id, user);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.email_index.contains_key(&user.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let user = user.into_user(UserId::generate(), Utc::now());
        let id = user.id().as_str().to_string();

        tables.email_index.insert(user.email().to_string(), id.clone());
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_one(&self, lookup: &UserLookup) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        let id = match lookup {
            UserLookup::Id(id) => id.as_str(),
            UserLookup::Email(email) => match tables.email_index.get(email) {
                Some(id) => id.as_str(),
                None => return Ok(None),
            },
        };

        Ok(tables.users.get(id).cloned())
    }
}
