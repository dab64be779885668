//! Conversational state for the narrative assistant

use crate::{ChatMessage, ChatProvider, LlmError};
use futures::StreamExt;
use tracing::warn;

/// First assistant message of every session
pub const GREETING: &str = "I'm your narrative intelligence assistant. Ask me about market beliefs, \
your portfolio exposure, or narrative conflicts. I help you understand *why* markets move, not predict *where*.";

/// Starter questions offered before the first message
pub const SUGGESTIONS: [&str; 4] = [
    "What narratives are most fragile right now?",
    "Explain my portfolio's exposure to AI",
    "What would break the soft landing thesis?",
    "Which narratives conflict with each other?",
];

/// An ordered conversation with one provider
///
/// `send` takes `&mut self`, so a session never has two requests in flight.
pub struct ChatSession<P> {
    provider: P,
    system_prompt: String,
    messages: Vec<ChatMessage>,
    // Indices of failure notices shown to the user but never sent upstream
    notices: Vec<usize>,
}

impl<P: ChatProvider> ChatSession<P> {
    /// Start a session seeded with the greeting
    pub fn new(provider: P, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            messages: vec![ChatMessage::assistant(GREETING)],
            notices: Vec::new(),
        }
    }

    /// Conversation so far, greeting first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The provider answering this session
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether the user has said anything yet
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1
    }

    /// Whether the message at `index` is a failure notice rather than a model reply
    pub fn is_notice(&self, index: usize) -> bool {
        self.notices.contains(&index)
    }

    /// Wire messages: system prompt, then the conversation without the
    /// greeting or failure notices
    fn request(&self) -> Vec<ChatMessage> {
        let conversation = self
            .messages
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(i, _)| !self.is_notice(*i))
            .map(|(_, m)| m.clone());

        std::iter::once(ChatMessage::system(self.system_prompt.clone()))
            .chain(conversation)
            .collect()
    }

    /// Send a user message and stream the reply
    ///
    /// Each content fragment is passed to `on_fragment` as it arrives. The
    /// assembled reply is appended to the conversation and returned.
    ///
    /// # Errors
    /// `LlmError::EmptyMessage` for blank input, leaving the conversation
    /// untouched. Any upstream failure is appended verbatim as an assistant
    /// notice and returned; nothing is retried. Notices are for display and
    /// are left out of later requests.
    pub async fn send<F>(&mut self, input: &str, mut on_fragment: F) -> Result<String, LlmError>
    where
        F: FnMut(&str),
    {
        let input = input.trim();
        if input.is_empty() {
            return Err(LlmError::EmptyMessage);
        }
        self.messages.push(ChatMessage::user(input));

        let mut stream = match self.provider.stream_chat(&self.request()).await {
            Ok(stream) => stream,
            Err(e) => return Err(self.record_failure(e)),
        };

        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    on_fragment(&fragment);
                    reply.push_str(&fragment);
                }
                Err(e) => {
                    if !reply.is_empty() {
                        self.messages.push(ChatMessage::assistant(reply));
                    }
                    return Err(self.record_failure(e));
                }
            }
        }

        self.messages.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    fn record_failure(&mut self, error: LlmError) -> LlmError {
        warn!(error = %error, "Chat request failed");
        self.notices.push(self.messages.len());
        self.messages.push(ChatMessage::assistant(error.to_string()));
        error
    }
}
