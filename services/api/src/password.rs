//! bcrypt password hashing
//!
//! bcrypt is deliberately slow, so both directions run on the blocking pool
//! instead of stalling the async workers.

use anyhow::{Result, anyhow};
use tracing::error;

pub use bcrypt::DEFAULT_COST;

/// Hash a plaintext password with the given bcrypt cost
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| anyhow!("Password hashing task failed: {}", e))?
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

/// Check a plaintext candidate against a stored bcrypt hash
///
/// A malformed stored hash verifies as `false`.
pub async fn verify_password(password: String, hash: String) -> bool {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;

    match verified {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            error!("Failed to verify password hash: {}", e);
            false
        }
        Err(e) => {
            error!("Password verification task failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("correct horse".to_string(), TEST_COST)
            .await
            .unwrap();

        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse".to_string(), hash.clone()).await);
        assert!(!verify_password("battery staple".to_string(), hash).await);
    }

    #[tokio::test]
    async fn test_same_password_hashes_differently() {
        let first = hash_password("pw".to_string(), TEST_COST).await.unwrap();
        let second = hash_password("pw".to_string(), TEST_COST).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("anything".to_string(), "not-a-hash".to_string()).await);
        assert!(!verify_password("".to_string(), String::new()).await);
    }

    #[tokio::test]
    async fn test_invalid_cost_is_an_error() {
        assert!(hash_password("pw".to_string(), 1).await.is_err());
    }
}
