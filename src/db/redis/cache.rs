use redis::AsyncCommands;
use redis::Client;
use tokio::sync::mpsc;

use crate::db::cache::{CacheKey, ResponseCache};
use crate::error::AppResult;

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Pending write handed to the background writer
struct CacheWrite {
    key: String,
    value: String,
}

/// Recommendation cache shared across processes through Redis
///
/// Reads go straight to Redis. Writes are queued to a background task so a
/// response is never held up by a cache store; a repeat request that arrives
/// before the queued write lands is a miss.
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Handle for flushing and stopping the background writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush queued writes and exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl RedisCache {
    /// Creates the cache and spawns its writer task; entries expire after `ttl` seconds
    pub fn new(redis_client: Client, ttl: u64) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::writer_task(client, ttl, write_rx, shutdown_rx).await;
        });

        (
            Self {
                redis_client,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx },
        )
    }

    async fn writer_task(
        client: Client,
        ttl: u64,
        mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(ttl, "Cache writer task started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::store(&client, ttl, write).await {
                        tracing::error!(error = %e, "Failed to write recommendation to Redis");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(write) = write_rx.recv().await {
                        match Self::store(&client, ttl, write).await {
                            Ok(()) => flushed += 1,
                            Err(e) => tracing::error!(error = %e, "Failed to flush cache write during shutdown"),
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn store(client: &Client, ttl: u64, write: CacheWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.value, ttl).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResponseCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    async fn set(&self, key: &CacheKey, value: String) {
        let write = CacheWrite {
            key: key.to_string(),
            value,
        };

        if let Err(e) = self.write_tx.send(write) {
            tracing::error!(error = %e, "Failed to queue cache write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }

    #[tokio::test]
    async fn test_shutdown_stops_writer() {
        // Client::open only parses the URL; no server is contacted here
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = RedisCache::new(client, 60);
        assert!(!cache.write_tx.is_closed());

        handle.shutdown().await;
        for _ in 0..50 {
            if cache.write_tx.is_closed() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        }
        assert!(cache.write_tx.is_closed());

        // queuing after shutdown is logged, not a panic
        let key = CacheKey::GroupRecommendation("after-shutdown".to_string());
        cache.set(&key, "{}".to_string()).await;
    }
}
