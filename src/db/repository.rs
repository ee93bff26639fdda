//! User repository for Files Manager.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::traits::UserStore;
use super::user::{NewUser, User};
use crate::{FilesError, Result};

/// SQLite-backed user repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, email, password) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .execute(&self.pool)
            .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| FilesError::NotFound("user".to_string()))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, email, password FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
