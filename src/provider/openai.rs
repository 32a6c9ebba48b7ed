//! OpenAI-compatible provider implementation.
//!
//! # API Compatibility
//!
//! Response structs preserve fields from the API payloads even where the
//! gateway does not consume them. Fields marked with `#[allow(dead_code)]`
//! are retained for:
//! - API contract completeness
//! - Future compatibility without breaking changes
//! - Debugging and logging purposes

use serde::{Deserialize, Serialize};

use crate::core::{HttpClient, HttpClientConfig};
use crate::credential::ApiKey;
use crate::error::GatewayError;
use crate::provider::constants::openai;

/// OpenAI-specific configuration for the completion client.
pub struct OpenAiConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub default_model: String,
    pub http_config: HttpClientConfig,
}

impl OpenAiConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: openai::API_BASE.to_string(),
            default_model: openai::DEFAULT_MODEL.to_string(),
            http_config: HttpClientConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose()),
        )
    }
}

/// Client for one OpenAI-compatible endpoint, bound to a validated key.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: HttpClient,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let http = HttpClient::new(&config.http_config, None)?;
        Ok(Self { config, http })
    }

    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// List the models visible to the configured key.
    ///
    /// Used as the auth liveness check during credential validation.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let url = format!("{}{}", self.config.base_url, openai::MODELS_ENDPOINT);
        let headers = vec![self.config.auth_header()];

        let list: ModelList = self.http.get_json(&url, &headers).await?;
        Ok(list.data)
    }

    /// Submit a single-turn chat completion and return the first choice's
    /// message text.
    ///
    /// Failures propagate to the caller unretried.
    pub async fn chat_completion(&self, prompt: &str, model: &str) -> Result<String, GatewayError> {
        let url = format!(
            "{}{}",
            self.config.base_url,
            openai::CHAT_COMPLETIONS_ENDPOINT
        );
        let headers = vec![self.config.auth_header()];
        let request = ChatCompletionRequest::single_turn(model, prompt);

        let response: ChatCompletionResponse =
            self.http.post_json(&url, &headers, &request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Parse {
                message: "No choices in response".to_string(),
                source: None,
            })?;

        Ok(choice.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    temperature: f32,
}

impl ChatCompletionRequest {
    /// Deterministic single-turn request; temperature is always 0.
    fn single_turn(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![RequestMessage {
                role: RequestRole::User,
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum RequestRole {
    User,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: RequestRole,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[allow(dead_code)]
    id: String,

    #[allow(dead_code)]
    model: String,

    choices: Vec<Choice>,

    #[allow(dead_code)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[allow(dead_code)]
    index: u32,

    message: ChoiceMessage,

    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// This is always `assistant`
    #[allow(dead_code)]
    role: String,

    content: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Usage {
    prompt_tokens: i32,
    completion_tokens: i32,
    total_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

/// A model entry from the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub owned_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_turn_request_pins_temperature_to_zero() {
        let request = ChatCompletionRequest::single_turn("test-model", "Say hello");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["model"], "test-model");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Say hello");
    }

    #[test]
    fn model_list_decodes_listing_payload() {
        let raw = serde_json::json!({
            "object": "list",
            "data": [
                { "id": "gpt-3.5-turbo", "owned_by": "openai" },
                { "id": "gpt-4", "owned_by": "openai" }
            ]
        });

        let list: ModelList = serde_json::from_value(raw).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].id, "gpt-3.5-turbo");
    }
}
