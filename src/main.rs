use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use volunteer_match::auth::JwtVerifier;
use volunteer_match::config::{CacheSettings, LoggingSettings, Settings, StorageBackend};
use volunteer_match::core::AvailabilityPolicy;
use volunteer_match::routes::{self, AppState};
use volunteer_match::services::{
    CachedEventDirectory, EventDirectory, InMemoryStore, MatchingOptions, PostgresClient,
};

fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

/// Put the event cache in front of the event directory when enabled
fn with_cache(cache: &CacheSettings, events: Arc<dyn EventDirectory>) -> Arc<dyn EventDirectory> {
    if !cache.enabled {
        return events;
    }

    info!(
        "Event cache enabled ({} entries, TTL: {}s)",
        cache.max_entries, cache.ttl_secs
    );
    Arc::new(CachedEventDirectory::new(events, cache.max_entries, cache.ttl_secs))
}

async fn build_state(settings: &Settings) -> std::io::Result<AppState> {
    let options = MatchingOptions {
        availability: AvailabilityPolicy::from_include_flag(settings.matching.include_unscheduled),
        notify_on_commit: settings.matching.notify_on_commit,
    };

    match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            Ok(AppState::new(
                store.clone(),
                with_cache(&settings.cache, store.clone()),
                store.clone(),
                store,
                options,
            ))
        }
        StorageBackend::Postgres => {
            let postgres = PostgresClient::from_settings(&settings.database)
                .await
                .map(Arc::new)
                .map_err(|e| {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
                })?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );

            Ok(AppState::new(
                postgres.clone(),
                with_cache(&settings.cache, postgres.clone()),
                postgres.clone(),
                postgres.clone(),
                options,
            )
            .with_postgres(postgres))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;

    init_logging(&settings.logging);

    info!("Starting volunteer matching service...");
    info!("Configuration loaded successfully");

    let app_state = build_state(&settings).await?;
    let verifier = web::Data::new(JwtVerifier::new(&settings.auth.jwt_secret));

    info!(
        "Matching configured (include unscheduled: {}, notify on commit: {})",
        settings.matching.include_unscheduled, settings.matching.notify_on_commit
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_origin = settings.server.cors_origin.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
