//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::domain::user::{NewUser, User, UserId, UserLookup, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, username, password_hash, is_admin, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_admin BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        info!("users table ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: NewUser) -> Result<User, DomainError> {
        let user = user.into_user(UserId::generate(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.is_admin())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());

            if unique_violation {
                DomainError::conflict(format!("Email '{}' is already registered", user.email()))
            } else {
                DomainError::storage(format!("Failed to save user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn find_one(&self, lookup: &UserLookup) -> Result<Option<User>, DomainError> {
        let (column, value) = match lookup {
            UserLookup::Id(id) => ("id", id.as_str()),
            UserLookup::Email(email) => ("email", email.as_str()),
        };

        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find user: {}", e)))?;

        row.map(|row| row_to_user(&row)).transpose()
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row.get("id");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let user_id = UserId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::from_parts(
        user_id,
        row.get::<String, _>("email"),
        row.get::<String, _>("username"),
        row.get::<String, _>("password_hash"),
        row.get::<bool, _>("is_admin"),
        created_at,
        updated_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_columns_cover_entity() {
        for column in ["id", "email", "username", "password_hash", "is_admin", "created_at", "updated_at"] {
            assert!(USER_COLUMNS.contains(column), "missing column {}", column);
        }
    }
}
