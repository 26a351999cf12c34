use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use gruff_api::{AppState, config::ServerConfig, create_router, jwt::JwtService, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Gruff API service");

    let config = ServerConfig::from_env()?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the built-in default key");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &sqlx::migrate!("./migrations")).await?;

    let jwt_service = JwtService::new(config.jwt_config())?;
    let app_state = AppState::with_pool(pool, jwt_service, config.bcrypt_cost);

    let app = create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    server::serve(
        listener,
        app,
        config.shutdown_timeout(),
        server::shutdown_signal(),
    )
    .await
}
