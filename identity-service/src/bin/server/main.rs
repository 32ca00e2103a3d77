use std::str::FromStr;
use std::sync::Arc;

use identity_service::config::Config;
use identity_service::config::run_mode;
use identity_service::domain::user::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::SqliteUserRepository;
use identity_service::outbound::security::Argon2CredentialHasher;
use identity_service::outbound::security::JwtTokenService;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        host = %config.server.host,
        http_port = config.server.http_port,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let run_mode = run_mode();
    match config.jwt.enforce_secret(&run_mode) {
        Ok(None) => {}
        Ok(Some(weakness)) => {
            tracing::warn!(%weakness, "Weak JWT secret, set JWT__SECRET before deploying");
        }
        Err(weakness) => {
            tracing::error!(%weakness, %run_mode, "Refusing to start with a weak JWT secret");
            return Err(weakness.into());
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "sqlite",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let hasher = Arc::new(Argon2CredentialHasher::new());
    let token_service = Arc::new(JwtTokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));
    let user_repository = Arc::new(SqliteUserRepository::new(pool));

    let identity_service = Arc::new(IdentityService::new(
        user_repository,
        hasher,
        Arc::clone(&token_service),
    ));

    let http_address = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(identity_service, token_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
