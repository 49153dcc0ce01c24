use medivia::{
    app, config, db,
    repositories::{SqliteTokenRepository, SqliteUserRepository},
    services::{
        create_email_service, AuthService, PasswordResetService, SessionTokenService, UserService,
    },
    AppState,
};

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medivia=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config::security::validate_production_config();

    // Database connection
    let pool = db::create_pool()
        .await
        .context("Failed to open the database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    // Initialize repositories
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let auth_service = Arc::new(AuthService::new(user_repository.clone()));
    let email_service = create_email_service();
    let password_reset_service = Arc::new(PasswordResetService::new(
        user_repository,
        token_repository,
        email_service,
    ));
    let session_tokens = Arc::new(SessionTokenService::from_env());

    let app_state = AppState {
        user_service,
        auth_service,
        password_reset_service,
        session_tokens,
        pool,
    };

    let app = app::build_router(app_state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .context("PORT must be a valid port number")?;

    let addr = SocketAddr::from((
        host.parse::<std::net::IpAddr>()
            .context("HOST must be a valid IP address")?,
        port,
    ));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
