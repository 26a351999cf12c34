//! Error types for the shared database plumbing

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failure while configuring, connecting to, or migrating the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Pool could not open a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A migration failed to apply
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Missing or malformed settings
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
