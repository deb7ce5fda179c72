use std::sync::Arc;

use crate::{
    db::{content_hash, CacheKey, ResponseCache},
    error::{AppError, AppResult},
    models::{CategorySelections, GenerationRequest, PreferenceRecord, Recommendation},
    services::{analysis, prompts, providers::TextGenerator},
};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const MAX_OUTPUT_TOKENS: u32 = 3000;
const TEMPERATURE: f32 = 0.7;

/// Which prompt a recommendation was generated from; shapes the error messages
#[derive(Debug, Clone, Copy)]
enum Audience {
    Group,
    Personal,
}

impl Audience {
    fn subject(&self) -> &'static str {
        match self {
            Audience::Group => "recommendations",
            Audience::Personal => "personal recommendations",
        }
    }
}

/// Generates movie recommendations from preference data
///
/// Each generation is a single upstream call. A failed call is turned into a
/// `Recommendation::Failed` payload rather than an error, and is never cached.
pub struct RecommendationService {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<dyn ResponseCache>,
    model: String,
}

impl RecommendationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        cache: Arc<dyn ResponseCache>,
        model: String,
    ) -> Self {
        Self {
            generator,
            cache,
            model,
        }
    }

    /// Group recommendations memoized by the content hash of `records`
    ///
    /// An unchanged preference set never reaches the endpoint twice once a
    /// successful result is stored. A cache that cannot be read counts as a miss.
    pub async fn cached_group_recommendations(
        &self,
        records: &[PreferenceRecord],
    ) -> AppResult<Recommendation> {
        let key = CacheKey::GroupRecommendation(content_hash(records)?);

        let cached = self.cache.get(&key).await.unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Recommendation cache unavailable, treating as miss");
            None
        });

        if let Some(raw) = cached {
            match serde_json::from_str::<Recommendation>(&raw) {
                Ok(cached) => {
                    tracing::debug!(key = %key, "Recommendation cache hit");
                    return Ok(cached);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                }
            }
        } else {
            tracing::debug!(key = %key, "Recommendation cache miss");
        }

        let recommendation = self.group_recommendations(records).await?;

        if recommendation.is_success() {
            let raw = serde_json::to_string(&recommendation)
                .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;
            self.cache.set(&key, raw).await;
        }

        Ok(recommendation)
    }

    /// Group recommendations for the whole preference set, uncached
    pub async fn group_recommendations(
        &self,
        records: &[PreferenceRecord],
    ) -> AppResult<Recommendation> {
        let analysis = analysis::aggregate(records)?;
        let prompt = prompts::group_prompt(&analysis);

        tracing::info!(
            total_users = analysis.total_users,
            "Generating group recommendations"
        );

        Ok(self.complete(prompt, Audience::Group).await)
    }

    /// Recommendations for one person's selections, uncached
    pub async fn personal_recommendations(&self, selections: &CategorySelections) -> Recommendation {
        let prompt = prompts::personal_prompt(selections);

        tracing::info!("Generating personal recommendations");

        self.complete(prompt, Audience::Personal).await
    }

    async fn complete(&self, prompt: String, audience: Audience) -> Recommendation {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        match self.generator.generate(&request).await {
            Ok(text) => Self::extract_markdown(text.trim(), audience),
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate {}", audience.subject());
                Recommendation::Failed {
                    error: format!("Error generating {}: {}", audience.subject(), e),
                    raw_response: String::new(),
                }
            }
        }
    }

    /// Passes the reply through as Markdown; only an empty reply is rejected
    fn extract_markdown(text: &str, audience: Audience) -> Recommendation {
        if text.is_empty() {
            return Recommendation::Failed {
                error: format!("Failed to extract Markdown {}", audience.subject()),
                raw_response: text.to_string(),
            };
        }

        Recommendation::Markdown {
            markdown: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCache;
    use crate::services::analysis::test_support::record;
    use crate::services::providers::MockTextGenerator;
    use tokio_test::{assert_err, assert_ok};

    fn group() -> Vec<PreferenceRecord> {
        vec![
            record(&["Action Adventure", "Mystery"], &["Thrilling"]),
            record(&["Mystery"], &["Thrilling", "Cozy"]),
        ]
    }

    fn service(generator: MockTextGenerator, cache: Arc<MemoryCache>) -> RecommendationService {
        RecommendationService::new(Arc::new(generator), cache, DEFAULT_MODEL.to_string())
    }

    #[tokio::test]
    async fn test_group_request_uses_fixed_generation_settings() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| {
                req.model == DEFAULT_MODEL
                    && req.max_tokens == 3000
                    && (req.temperature - 0.7).abs() < f32::EPSILON
                    && req.prompt.contains("Top Genres: Mystery, Action Adventure")
            })
            .times(1)
            .returning(|_| Ok("  ## Must-Watch\n1. Zodiac (2007)\n".to_string()));

        let service = service(generator, Arc::new(MemoryCache::new()));
        let result = service.group_recommendations(&group()).await.unwrap();

        assert_eq!(
            result,
            Recommendation::Markdown {
                markdown: "## Must-Watch\n1. Zodiac (2007)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_cached_group_calls_endpoint_once() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok("## Picks".to_string()));

        let cache = Arc::new(MemoryCache::new());
        let service = service(generator, cache.clone());
        let records = group();

        let first = service.cached_group_recommendations(&records).await.unwrap();
        let second = service.cached_group_recommendations(&records).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.entry_count().await, 1);
    }

    /// Cache whose reads always fail, as when Redis is unreachable
    struct UnreachableCache;

    #[async_trait::async_trait]
    impl ResponseCache for UnreachableCache {
        async fn get(&self, _key: &CacheKey) -> AppResult<Option<String>> {
            Err(AppError::Internal("redis connection refused".to_string()))
        }

        async fn set(&self, _key: &CacheKey, _value: String) {}
    }

    #[tokio::test]
    async fn test_unreadable_cache_falls_through_to_endpoint() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok("## Picks".to_string()));

        let service = RecommendationService::new(
            Arc::new(generator),
            Arc::new(UnreachableCache),
            DEFAULT_MODEL.to_string(),
        );

        let result = service.cached_group_recommendations(&group()).await;
        assert!(assert_ok!(result).is_success());
    }

    #[tokio::test]
    async fn test_changed_preferences_miss_the_cache() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(2)
            .returning(|_| Ok("## Picks".to_string()));

        let service = service(generator, Arc::new(MemoryCache::new()));
        let mut records = group();

        assert_ok!(service.cached_group_recommendations(&records).await);
        records.push(record(&["Fantasy"], &["Cozy"]));
        assert_ok!(service.cached_group_recommendations(&records).await);
    }

    #[tokio::test]
    async fn test_failed_call_returns_error_payload_and_is_not_cached() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(2)
            .returning(|_| Err(AppError::ExternalApi("rate limited".to_string())));

        let cache = Arc::new(MemoryCache::new());
        let service = service(generator, cache.clone());
        let records = group();

        let first = service.cached_group_recommendations(&records).await.unwrap();
        match &first {
            Recommendation::Failed {
                error,
                raw_response,
            } => {
                assert!(error.starts_with("Error generating recommendations:"));
                assert!(error.contains("rate limited"));
                assert!(raw_response.is_empty());
            }
            other => panic!("expected failure, got {:?}", other),
        }

        // the retry reaches the endpoint again
        let second = service.cached_group_recommendations(&records).await.unwrap();
        assert!(!second.is_success());
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_reply_is_extraction_failure() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("   \n".to_string()));

        let service = service(generator, Arc::new(MemoryCache::new()));
        let result = service.group_recommendations(&group()).await.unwrap();

        assert_eq!(
            result,
            Recommendation::Failed {
                error: "Failed to extract Markdown recommendations".to_string(),
                raw_response: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_reply_passes_through() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("not markdown at all {".to_string()));

        let service = service(generator, Arc::new(MemoryCache::new()));
        let result = service.group_recommendations(&group()).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_group_without_records_is_invalid_input() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let service = service(generator, Arc::new(MemoryCache::new()));
        let result = service.cached_group_recommendations(&[]).await;
        assert!(matches!(assert_err!(result), AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_personal_failure_message() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.prompt.contains("Favorite Genres: Mystery, Action Adventure"))
            .returning(|_| Err(AppError::ExternalApi("invalid x-api-key".to_string())));

        let service = service(generator, Arc::new(MemoryCache::new()));
        let selections = record(&["Mystery", "Action Adventure"], &["Cozy"]).selections;

        match service.personal_recommendations(&selections).await {
            Recommendation::Failed { error, .. } => {
                assert!(error.starts_with("Error generating personal recommendations:"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
