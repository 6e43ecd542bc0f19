//! User infrastructure module
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories, and
//! the account service built on top of them.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    AccountConfig, AccountService, IssuedToken, RegisterRequest, CREDENTIALS_MISMATCH,
    EMAIL_TAKEN, INVALID_TOKEN, NO_MATCHING_ACCOUNT,
};
