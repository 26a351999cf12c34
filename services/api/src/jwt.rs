//! JWT service for session token issuance and validation
//!
//! Tokens are HS256-signed copies of the user's public attributes with an
//! expiry. Nothing is stored server side, so a token stays valid until it
//! expires. Retired signing keys can be kept around for verification only,
//! which lets a deployment rotate `JWT_SECRET` without logging everyone out.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::User;

/// Signing key the service falls back to when none is configured
pub const DEFAULT_SECRET: &str = "secret";

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Key used to sign new tokens
    pub secret: String,
    /// Retired keys still accepted when validating
    pub previous_secrets: Vec<String>,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            previous_secrets: Vec::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub img: String,
    pub curator: bool,
    pub admin: bool,
    /// Expiration time (seconds since the epoch)
    pub exp: i64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_keys: Vec<DecodingKey>,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(anyhow!("JWT secret must not be empty"));
        }
        if config.token_ttl_hours <= 0 {
            return Err(anyhow!(
                "Token lifetime must be positive, got {} hours",
                config.token_ttl_hours
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_keys = std::iter::once(&config.secret)
            .chain(config.previous_secrets.iter().filter(|s| !s.is_empty()))
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
            .collect();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(JwtService {
            encoding_key,
            decoding_keys,
            validation,
            token_ttl: Duration::hours(config.token_ttl_hours),
        })
    }

    /// Issue a token for `user` expiring one lifetime from now
    pub fn token_for_user(&self, user: &User) -> Result<String> {
        self.token_for_user_at(user, Utc::now())
    }

    /// Issue a token for `user` as if issued at `issued_at`
    pub fn token_for_user_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = TokenClaims {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            img: user.image.clone(),
            curator: user.curator,
            admin: user.admin,
            exp: (issued_at + self.token_ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    ///
    /// The current key is tried first, then each retired key in order.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let mut last_error = None;

        for key in &self.decoding_keys {
            match decode::<TokenClaims>(token, key, &self.validation) {
                Ok(data) => return Ok(data.claims),
                Err(e) => {
                    debug!("Token rejected by signing key: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) => anyhow!("Invalid token: {}", e),
            None => anyhow!("No signing keys configured"),
        })
    }

    /// Token lifetime
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}
