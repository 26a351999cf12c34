//! Persistence ports and their PostgreSQL implementations
//!
//! The service only ever talks to the traits, so the store can be swapped
//! (the integration tests run against in-memory implementations).

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Claim, NewUser, Paging, User};

pub mod claim;
pub mod user;

pub use claim::PgClaimRepository;
pub use user::PgUserRepository;

/// Storage for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails on duplicate username or email
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Write every mutable column of `user` and return the stored record
    async fn save(&self, user: &User) -> Result<User>;
}

/// Read access to claims by their creator
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Claims created by `creator_id`, newest first
    async fn list_by_creator(&self, creator_id: i64, paging: &Paging) -> Result<Vec<Claim>>;

    async fn count_by_creator(&self, creator_id: i64) -> Result<i64>;
}
