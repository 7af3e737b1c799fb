use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use listing_service::config::Config;
use listing_service::domain::image::ports::ImageStorage;
use listing_service::domain::listing::service::ListingService;
use listing_service::domain::user::service::UserService;
use listing_service::inbound::http::router::create_router;
use listing_service::outbound::media::CloudinaryImageStorage;
use listing_service::outbound::repositories::PostgresListingRepository;
use listing_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const RECOMMENDED_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "listing-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        token_expiration_hours = ?config.jwt.expiration_hours,
        media_configured = config.media.is_some(),
        "Configuration loaded"
    );

    if config.jwt.secret.len() < RECOMMENDED_SECRET_BYTES {
        tracing::warn!(
            secret_bytes = config.jwt.secret.len(),
            recommended = RECOMMENDED_SECRET_BYTES,
            "JWT secret is shorter than recommended"
        );
    }

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

    let mut authenticator = Authenticator::new(config.jwt.secret.as_bytes());
    if let Some(hours) = config.jwt.expiration_hours {
        authenticator = authenticator.with_token_lifetime(Duration::hours(hours));
    }
    let authenticator = Arc::new(authenticator);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let listing_repository = Arc::new(PostgresListingRepository::new(pg_pool));

    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));
    let listing_service = Arc::new(ListingService::new(listing_repository));

    let image_storage = match &config.media {
        Some(media) => {
            Some(Arc::new(CloudinaryImageStorage::new(media)) as Arc<dyn ImageStorage>)
        }
        None => {
            tracing::warn!("Media host is not configured; image uploads are disabled");
            None
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

    let http_application =
        create_router(user_service, listing_service, image_storage, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
