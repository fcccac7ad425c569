use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ANTHROPIC_MODEL;

use super::{Completer, Completion, TokenUsage, api_key_from_env};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const MAX_TOKENS: u32 = 4096;

/// Calls the Anthropic Messages API.
pub struct AnthropicCompleter {
    client: reqwest::Client,
    model: String,
    api_key: Option<String>,
}

impl AnthropicCompleter {
    pub fn new(model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            api_key: None,
        }
    }

    /// Use a fixed key instead of reading `ANTHROPIC_API_KEY` on each call.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| api_key_from_env(API_KEY_ENV))
            .ok_or_else(|| anyhow!("no Anthropic credentials found. Set {API_KEY_ENV}."))
    }

    fn parse_response(api_resp: ApiResponse) -> Completion {
        // Extract text from content blocks
        let text: String = api_resp
            .content
            .iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text.as_deref()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = api_resp.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });

        Completion {
            content: (!text.is_empty()).then_some(text),
            usage,
        }
    }
}

#[async_trait]
impl Completer for AnthropicCompleter {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let api_key = self.api_key()?;

        let messages = [Message {
            role: "user",
            content: prompt,
        }];
        let body = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: &messages,
        };

        let resp = self
            .client
            .post(API_URL)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", &api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Anthropic API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp.json().await?;
        Ok(Self::parse_response(api_resp))
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message<'a>],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
