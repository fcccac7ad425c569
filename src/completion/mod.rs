pub mod anthropic;
pub mod mock;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

/// Token usage from a single completion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// What came back from the completion service.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// First response message. `None` when the service answered without text.
    pub content: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            usage: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// The hosted text-generation service. Prompt in, text out.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Provider name for logs and the startup banner.
    fn provider(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send `prompt` as a single user message.
    async fn complete(&self, prompt: &str) -> Result<Completion>;
}

/// Read an API key from the environment, treating empty values as unset.
pub(crate) fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|key| !key.is_empty())
}
