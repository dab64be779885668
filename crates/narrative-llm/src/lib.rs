//! Narrative LLM Layer
//!
//! Streaming chat client for the narrative assistant and the explainers.
//!
//! # Architecture
//!
//! ```text
//! ChatSession / ExplainRequest
//!        │ Vec<ChatMessage>
//!        ▼
//!   ChatProvider ──► GatewayClient ──HTTP──► /v1/chat/completions
//!        │                               (text/event-stream)
//!        ▼
//!   ChatStream ◄── SseDecoder ◄── body bytes
//! ```
//!
//! # Providers
//!
//! - `GatewayClient`: OpenAI-compatible HTTP gateway
//! - `MockProvider`: Scripted fragments or failures for tests
//!
//! # Examples
//!
//! ```
//! use narrative_llm::{ChatSession, MockProvider};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let mut session = ChatSession::new(MockProvider::new(["Beliefs ", "move markets."]), "system");
//!     let reply = session.send("Why?", |fragment| print!("{}", fragment)).await.unwrap();
//!     assert_eq!(reply, "Beliefs move markets.");
//! });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod gateway;
pub mod message;
pub mod prompt;
pub mod session;
pub mod sse;

pub use config::GatewayConfig;
pub use gateway::GatewayClient;
pub use message::{ChatMessage, Role};
pub use prompt::{assistant_system_prompt, ExplainRequest, ANALYST_SYSTEM_PROMPT};
pub use session::{ChatSession, GREETING, SUGGESTIONS};
pub use sse::{DecoderState, SseDecoder};

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// The gateway answered 429
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    /// The gateway answered 402
    #[error("AI usage limit reached. Please add credits.")]
    QuotaExhausted,

    /// Any other non-success status
    #[error("AI service error (status {status})")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body as returned
        body: String,
    },

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Missing key or unusable settings
    #[error("{0}")]
    Configuration(String),

    /// Blank user input
    #[error("Message is empty")]
    EmptyMessage,
}

impl LlmError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            429 => LlmError::RateLimited,
            402 => LlmError::QuotaExhausted,
            status => LlmError::Service {
                status,
                body: body.into(),
            },
        }
    }
}

/// Stream of content fragments from one completion
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// A backend that answers a conversation with streamed text
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Start a streamed completion for `messages`
    ///
    /// Status failures surface here; transport failures after the first
    /// byte surface as an `Err` item in the stream.
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<ChatStream, LlmError>;
}

#[derive(Debug, Clone)]
enum Script {
    Fragments(Vec<String>),
    Status(u16),
    Interrupted { fragments: Vec<String>, error: String },
}

/// Scripted chat provider for deterministic testing
///
/// Clones share the request log, so a test can keep a handle while a
/// session owns the provider.
///
/// # Examples
///
/// ```
/// use narrative_llm::{ChatMessage, ChatProvider, LlmError, MockProvider};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let provider = MockProvider::failing(402);
///     let result = provider.stream_chat(&[ChatMessage::user("hi")]).await;
///     assert!(matches!(result, Err(LlmError::QuotaExhausted)));
///     assert_eq!(provider.call_count(), 1);
/// });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    script: Script,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockProvider {
    /// Answer every request with these fragments
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(Script::Fragments(fragments.into_iter().map(Into::into).collect()))
    }

    /// Fail every request as the gateway would with `status`
    pub fn failing(status: u16) -> Self {
        Self::with_script(Script::Status(status))
    }

    /// Yield `fragments`, then fail with a transport error
    pub fn interrupted<I, S>(fragments: I, error: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(Script::Interrupted {
            fragments: fragments.into_iter().map(Into::into).collect(),
            error: error.into(),
        })
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<Vec<ChatMessage>>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of times stream_chat was called
    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        self.log().clear();
    }

    /// Messages of the most recent request
    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.log().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(["Default mock response"])
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<ChatStream, LlmError> {
        self.log().push(messages.to_vec());

        let items: Vec<Result<String, LlmError>> = match &self.script {
            Script::Status(status) => return Err(LlmError::from_status(*status, "mock failure")),
            Script::Fragments(fragments) => fragments.iter().cloned().map(Ok).collect(),
            Script::Interrupted { fragments, error } => fragments
                .iter()
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(LlmError::Communication(error.clone()))))
                .collect(),
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
