//! Anthropic Claude provider implementation
//!
//! This module implements the LLMProvider trait for Anthropic's Claude models.
//! See: https://docs.anthropic.com/en/api/messages

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
    MessageContent, Result, Role, StopReason, TokenUsage,
};
use analyst_utils::{env_parse, env_string};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL of the API, without the trailing `/messages`
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_ANTHROPIC_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `ANTHROPIC_API_KEY`. `ANTHROPIC_API_BASE` and
    /// `ANTHROPIC_TIMEOUT_SECS` override the defaults when set; a malformed
    /// timeout is an error.
    pub fn from_env() -> Result<Self> {
        let api_key = env_string("ANTHROPIC_API_KEY").ok_or_else(|| {
            LLMError::ConfigurationError(
                "ANTHROPIC_API_KEY environment variable not set".to_string(),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = env_string("ANTHROPIC_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(timeout) = env_parse::<u64>("ANTHROPIC_TIMEOUT_SECS")
            .map_err(|e| LLMError::ConfigurationError(e.to_string()))?
        {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(AnthropicConfig::new(api_key))
    }

    /// Create a provider from an explicit configuration
    pub fn with_config(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Anthropic API key is empty".to_string(),
            ));
        }
        if config.timeout_secs == 0 {
            return Err(LLMError::ConfigurationError(
                "Anthropic timeout must be greater than 0 seconds".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// See [`AnthropicConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::with_config(AnthropicConfig::from_env()?)
    }

    /// The configuration this provider was built with
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Anthropic API");

        let anthropic_request = AnthropicRequest {
            model: request.model,
            messages: request.messages,
            system: request.system,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/messages", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&anthropic_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(anthropic_request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let anthropic_response: AnthropicResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        debug!(
            "Received response - stop_reason: {}, tokens: {}/{}",
            anthropic_response.stop_reason,
            anthropic_response.usage.input_tokens,
            anthropic_response.usage.output_tokens
        );

        Ok(CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: MessageContent::Blocks(anthropic_response.content),
            },
            stop_reason: match anthropic_response.stop_reason.as_str() {
                "end_turn" => StopReason::EndTurn,
                "max_tokens" => StopReason::MaxTokens,
                "stop_sequence" => StopReason::StopSequence,
                other => {
                    debug!("Unknown stop reason: {other}");
                    StopReason::Other
                }
            },
            usage: TokenUsage {
                input_tokens: anthropic_response.usage.input_tokens,
                output_tokens: anthropic_response.usage.output_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

// Anthropic-specific request/response types
// These match the Anthropic API format exactly

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: String,
    usage: UsageResponse,
}

#[derive(Debug, Deserialize)]
struct UsageResponse {
    input_tokens: usize,
    output_tokens: usize,
}
