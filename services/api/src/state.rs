//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    repositories::{ClaimRepository, PgClaimRepository, PgUserRepository, UserRepository},
    service::AccountService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub accounts: AccountService,
}

impl AppState {
    /// Build the state from explicit repositories
    pub fn new(
        users: Arc<dyn UserRepository>,
        claims: Arc<dyn ClaimRepository>,
        jwt_service: JwtService,
        bcrypt_cost: u32,
    ) -> Self {
        let accounts = AccountService::new(users, claims, jwt_service.clone(), bcrypt_cost);

        Self {
            jwt_service,
            accounts,
        }
    }

    /// Build the state over a PostgreSQL pool
    pub fn with_pool(pool: PgPool, jwt_service: JwtService, bcrypt_cost: u32) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgClaimRepository::new(pool)),
            jwt_service,
            bcrypt_cost,
        )
    }
}
