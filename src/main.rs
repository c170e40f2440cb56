//! Media Poster Wall & Resource Ranker — Binary Entrypoint
//! Boots the Axum HTTP server, wiring settings, shared clients, and routes.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use media_resource_ranker::api::{self, AppState};
use media_resource_ranker::cache::TtlCache;
use media_resource_ranker::catalog::CatalogClient;
use media_resource_ranker::config::Settings;
use media_resource_ranker::listing::HttpListingProvider;
use media_resource_ranker::metrics::Metrics;
use media_resource_ranker::search::SearchService;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("media_resource_ranker=info,tower_http=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let settings = Settings::from_env()?;

    let metrics = Metrics::init(settings.cache_ttl_secs);

    let catalog = Arc::new(CatalogClient::new(
        &settings.catalog_api_key,
        &settings.catalog_api_base,
        &settings.catalog_image_base,
        &settings.default_language,
    ));
    let listing = Arc::new(HttpListingProvider::new(
        &settings.listing_base_url,
        Duration::from_secs(settings.listing_timeout_secs),
    )?);
    let cache = TtlCache::new(
        settings.cache_enabled,
        Duration::from_secs(settings.cache_ttl_secs),
    );
    let service = Arc::new(SearchService::new(
        Arc::clone(&catalog),
        listing,
        cache,
        settings.max_results_default,
    ));

    let state = AppState { service, catalog };
    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
