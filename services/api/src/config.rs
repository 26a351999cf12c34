//! Server configuration loaded from the environment

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::jwt::{DEFAULT_SECRET, DEFAULT_TOKEN_TTL_HOURS, JwtConfig};

/// Server configuration
///
/// # Environment Variables
/// - `PORT`: listen port (default: 8080)
/// - `JWT_SECRET`: token signing key (default: the built-in key)
/// - `JWT_PREVIOUS_SECRETS`: comma separated retired keys still accepted
/// - `TOKEN_TTL_HOURS`: token lifetime (default: 72)
/// - `BCRYPT_COST`: bcrypt work factor (default: 12)
/// - `SHUTDOWN_TIMEOUT_SECS`: graceful shutdown bound (default: 10)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default)]
    pub jwt_previous_secrets: Vec<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_jwt_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

fn default_bcrypt_cost() -> u32 {
    crate::password::DEFAULT_COST
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            jwt_secret: default_jwt_secret(),
            jwt_previous_secrets: Vec::new(),
            token_ttl_hours: default_token_ttl_hours(),
            bcrypt_cost: default_bcrypt_cost(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Config::builder()
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("jwt_previous_secrets"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Whether tokens are signed with the built-in key
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_SECRET
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            previous_secrets: self.jwt_previous_secrets.clone(),
            token_ttl_hours: self.token_ttl_hours,
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
