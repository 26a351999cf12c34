//! Gruff API service
//!
//! Account endpoints of the Gruff debate platform: signup, signin, password
//! change, reading and updating the authenticated user, and listing the
//! claims that user created. Sessions are stateless HS256 bearer tokens;
//! records live in PostgreSQL.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
