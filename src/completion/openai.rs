use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_OPENAI_MODEL;

use super::{Completer, Completion, TokenUsage, api_key_from_env};

const BASE_URL: &str = "https://api.openai.com/v1";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Calls an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompleter {
    client: reqwest::Client,
    model: String,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiCompleter {
    pub fn new(model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            api_url: format!("{BASE_URL}/chat/completions"),
            api_key: None,
        }
    }

    /// Point at a different base URL (proxies, compatible servers).
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_url = format!("{}/chat/completions", base.trim_end_matches('/'));
        self
    }

    /// Use a fixed key instead of reading `OPENAI_API_KEY` on each call.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| api_key_from_env(API_KEY_ENV))
            .ok_or_else(|| anyhow!("no OpenAI credentials found. Set {API_KEY_ENV}."))
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn parse_response(api_resp: ApiResponse) -> Completion {
        let content = api_resp
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty());

        let usage = api_resp.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Completion { content, usage }
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let api_key = self.api_key()?;
        let body = self.build_request(prompt);

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("OpenAI API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp.json().await?;
        Ok(Self::parse_response(api_resp))
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
