/// Anthropic Messages API client
///
/// Sends one `POST /v1/messages` per call and concatenates the text blocks
/// of the reply. Failures surface as `AppError` without retrying.
use crate::{
    error::{AppError, AppResult},
    models::GenerationRequest,
    services::providers::TextGenerator,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct AnthropicClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Anthropic API key is required".to_string(),
            ));
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_body<'a>(request: &'a GenerationRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ApiMessage {
                role: "user",
                content: &request.prompt,
            }],
        }
    }

    /// Joins the text blocks of a reply; a reply without any is an error
    fn extract_text(response: MessagesResponse) -> AppResult<String> {
        let texts: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        if texts.is_empty() {
            return Err(AppError::ExternalApi(
                "Anthropic response contained no text content".to_string(),
            ));
        }

        Ok(texts.concat())
    }
}

#[async_trait::async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let url = format!("{}/v1/messages", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&Self::build_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Anthropic API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(bytes = response_text.len(), "Raw Anthropic API response received");

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize Anthropic response");
            AppError::ExternalApi(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let text = Self::extract_text(parsed)?;

        tracing::info!(
            model = %request.model,
            output_chars = text.len(),
            provider = "anthropic",
            "Generation completed"
        );

        Ok(text)
    }
}
