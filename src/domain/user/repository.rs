//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Filter for single-user lookups; both keys are unique in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(UserId),
    Email(String),
}

impl UserLookup {
    /// Check whether a stored user matches this filter.
    ///
    /// Email matching is exact (case-sensitive).
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id() == id,
            Self::Email(email) => user.email() == email,
        }
    }
}

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Persist a new user, assigning its identifier and timestamps.
    ///
    /// Fails with a conflict if the email is already taken.
    async fn save(&self, user: NewUser) -> Result<User, DomainError>;

    /// Find the single user matching the filter
    async fn find_one(&self, lookup: &UserLookup) -> Result<Option<User>, DomainError>;

    /// Get a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.find_one(&UserLookup::Id(id.clone())).await
    }

    /// Get a user by their email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one(&UserLookup::Email(email.to_string())).await
    }

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
