use serde::{Deserialize, Serialize};

/// Result of one recommendation request
///
/// Serializes to either `{"markdown": ...}` or `{"error": ..., "raw_response": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Recommendation {
    Markdown {
        markdown: String,
    },
    Failed {
        error: String,
        raw_response: String,
    },
}

impl Recommendation {
    pub fn is_success(&self) -> bool {
        matches!(self, Recommendation::Markdown { .. })
    }
}

/// A single request to the text generation endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}
