use std::sync::Arc;
use std::time::Duration;

use filmclub_api::{
    api::{create_router, AppState},
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, CacheWriterHandle, MemoryCache,
        PgPreferenceStore, RedisCache, ResponseCache,
    },
    services::{providers::AnthropicClient, RecommendationService},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("filmclub_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    let store = Arc::new(PgPreferenceStore::new(pool));

    let (cache, cache_writer): (Arc<dyn ResponseCache>, Option<CacheWriterHandle>) =
        match &config.redis_url {
            Some(redis_url) => {
                let client = create_redis_client(redis_url)?;
                let (cache, handle) = RedisCache::new(client, config.cache_ttl_secs);
                tracing::info!("Caching recommendations in Redis");
                (Arc::new(cache) as Arc<dyn ResponseCache>, Some(handle))
            }
            None => {
                tracing::info!("REDIS_URL not set, caching recommendations in memory");
                (Arc::new(MemoryCache::new()) as Arc<dyn ResponseCache>, None)
            }
        };

    let generator = Arc::new(AnthropicClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?);

    let recommendations = Arc::new(RecommendationService::new(
        generator,
        cache,
        config.recommendation_model.clone(),
    ));

    let app = create_router(AppState::new(store, recommendations));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
