//! Streaming chat completions over the AI gateway
//!
//! The gateway speaks the OpenAI chat completions dialect. Requests always
//! ask for `stream: true` and the body is decoded incrementally by
//! [`content_stream`](crate::sse::content_stream).
//!
//! # Examples
//!
//! ```no_run
//! use futures::StreamExt;
//! use narrative_llm::{ChatMessage, ChatProvider, GatewayClient, GatewayConfig};
//!
//! # async fn example() -> Result<(), narrative_llm::LlmError> {
//! let client = GatewayClient::from_config(&GatewayConfig::default())?;
//! let mut stream = client
//!     .stream_chat(&[ChatMessage::system("Be brief."), ChatMessage::user("Hello")])
//!     .await?;
//! while let Some(fragment) = stream.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

use crate::sse::content_stream;
use crate::{ChatMessage, ChatProvider, ChatStream, GatewayConfig, LlmError};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

/// Request body for the chat completions endpoint
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Chat provider backed by the HTTP gateway
pub struct GatewayClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl GatewayClient {
    /// Create a client with an explicit API key
    ///
    /// # Errors
    /// `LlmError::Configuration` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &GatewayConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Configuration)?;

        // A streamed reply may run longer than the timeout; only stalls count.
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.completions_url(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Create a client reading the API key from the configured variable
    pub fn from_config(config: &GatewayConfig) -> Result<Self, LlmError> {
        let key = config.api_key()?;
        Self::new(config, key)
    }

    /// Model sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatProvider for GatewayClient {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<ChatStream, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            stream: true,
        };
        debug!(url = %self.url, model = %self.model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat gateway unreachable");
                LlmError::Communication(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Chat gateway returned an error");
            return Err(LlmError::from_status(status.as_u16(), text));
        }

        Ok(content_stream(response.bytes_stream()))
    }
}
