use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::gate::AuthGate;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::handlers::ErrorTranslator;
use account_service::inbound::http::router::cors_layer;
use account_service::inbound::http::router::create_router;
use account_service::outbound::random::ThreadRandom;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    config.validate()?;

    tracing::info!(
        run_mode = %config.run_mode,
        http_port = config.server.http_port,
        cors_origin = %config.server.cors_origin,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_ttl = chrono::Duration::try_hours(config.jwt.expiration_hours)
        .ok_or_else(|| anyhow::anyhow!("jwt.expiration_hours is out of range"))?;
    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes(), token_ttl)?);
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
        Arc::new(ThreadRandom),
    ));
    let auth_gate = Arc::new(AuthGate::new(user_repository, authenticator));

    let http_application = create_router(
        auth_service,
        auth_gate,
        ErrorTranslator::new(!config.is_production()),
        cors_layer(&config.server.cors_origin)?,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
