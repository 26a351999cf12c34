//! PostgreSQL claim repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::ClaimRepository;
use crate::models::{Claim, Paging};

/// Claim repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgClaimRepository {
    pool: PgPool,
}

impl PgClaimRepository {
    /// Create a new claim repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimRepository for PgClaimRepository {
    async fn list_by_creator(&self, creator_id: i64, paging: &Paging) -> Result<Vec<Claim>> {
        // LIMIT NULL is no limit in PostgreSQL
        let claims = sqlx::query_as::<_, Claim>(
            r#"
            SELECT id, title, description, created_by_id, created_at, updated_at
            FROM claims
            WHERE created_by_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator_id)
        .bind(paging.limit.map(i64::from))
        .bind(i64::from(paging.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(claims)
    }

    async fn count_by_creator(&self, creator_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE created_by_id = $1")
            .bind(creator_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
