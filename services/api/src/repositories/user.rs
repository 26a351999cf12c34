//! PostgreSQL user repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::UserRepository;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str =
    "id, name, username, email, img, hashed_password, curator, admin, created_at, updated_at";

/// User repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.username);

        let sql = format!(
            r#"
            INSERT INTO users (name, username, email, img, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.name)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.image)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User> {
        info!("Saving user: {}", user.id);

        let sql = format!(
            r#"
            UPDATE users
            SET name = $2, username = $3, email = $4, img = $5,
                hashed_password = $6, curator = $7, admin = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.image)
            .bind(&user.hashed_password)
            .bind(user.curator)
            .bind(user.admin)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }
}
