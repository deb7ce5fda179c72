/// Text generation provider abstraction
///
/// Recommendations are produced by a hosted language model. The rest of the
/// service only sees this trait, so tests can substitute a counting fake and
/// the endpoint can be swapped without touching prompt or cache logic.
use crate::{error::AppResult, models::GenerationRequest};

pub mod anthropic;

pub use anthropic::AnthropicClient;

/// A single-shot text generation endpoint
///
/// One call is one upstream request: implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends the prompt and returns the generated text
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
