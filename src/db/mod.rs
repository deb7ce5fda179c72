pub mod cache;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use cache::{content_hash, CacheKey, MemoryCache, ResponseCache};
pub use memory::MemoryPreferenceStore;
pub use postgres::{create_pool, run_migrations, PgPreferenceStore};
pub use self::redis::{create_redis_client, CacheWriterHandle, RedisCache};
pub use store::PreferenceStore;
