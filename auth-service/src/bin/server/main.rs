use std::net::SocketAddr;
use std::sync::Arc;

use auth::TokenIssuer;
use auth_service::config::Config;
use auth_service::config::StorageBackend;
use auth_service::domain::user::ports::AuthServicePort;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MIN_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        repository_timeout_ms = config.storage.timeout_ms,
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    if config.jwt.secret.len() < MIN_SECRET_BYTES {
        tracing::warn!(
            min_bytes = MIN_SECRET_BYTES,
            "JWT signing secret is shorter than recommended for HS256"
        );
    }

    // Loaded once; the issuer keeps this secret for the process lifetime.
    let token_issuer = Arc::new(TokenIssuer::new(config.jwt.secret.as_bytes()));
    let token_ttl = chrono::Duration::hours(config.jwt.expiration_hours);

    let auth_service: Arc<dyn AuthServicePort> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!(storage = "memory", "Using in-memory user repository");
            let repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(
                AuthService::new(repository, token_issuer, token_ttl)
                    .with_repository_timeout(config.storage.timeout()),
            )
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.url is required for postgres"))?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .acquire_timeout(config.storage.timeout())
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.storage.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresUserRepository::new(pg_pool));
            Arc::new(
                AuthService::new(repository, token_issuer, token_ttl)
                    .with_repository_timeout(config.storage.timeout()),
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, config.about);

    if let Err(e) = axum::serve(
        http_listener,
        http_application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
