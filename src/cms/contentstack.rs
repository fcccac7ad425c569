use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::str::FromStr;

use super::{ContentSource, Page};

const PAGE_CONTENT_TYPE: &str = "page";

/// Hosting region of the stack. Decides the delivery host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Us,
    Eu,
    AzureNa,
    AzureEu,
    GcpNa,
}

impl Region {
    pub fn delivery_host(&self) -> &'static str {
        match self {
            Region::Us => "cdn.contentstack.io",
            Region::Eu => "eu-cdn.contentstack.com",
            Region::AzureNa => "azure-na-cdn.contentstack.com",
            Region::AzureEu => "azure-eu-cdn.contentstack.com",
            Region::GcpNa => "gcp-na-cdn.contentstack.com",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region: {0} (expected us, eu, azure-na, azure-eu or gcp-na)")]
pub struct UnknownRegion(String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "us" | "na" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "azure-na" | "azure_na" => Ok(Region::AzureNa),
            "azure-eu" | "azure_eu" => Ok(Region::AzureEu),
            "gcp-na" | "gcp_na" => Ok(Region::GcpNa),
            _ => Err(UnknownRegion(s.to_string())),
        }
    }
}

/// Stack credentials for the delivery API.
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub api_key: String,
    pub delivery_token: String,
    pub environment: String,
    pub region: Region,
}

/// Fetches published entries from the Contentstack delivery API.
pub struct ContentstackClient {
    client: reqwest::Client,
    config: StackConfig,
    base_url: String,
    content_type: String,
}

impl ContentstackClient {
    pub fn new(config: StackConfig) -> Self {
        let base_url = format!("https://{}", config.region.delivery_host());
        Self {
            client: reqwest::Client::new(),
            config,
            base_url,
            content_type: PAGE_CONTENT_TYPE.to_string(),
        }
    }

    /// Point at a different host (self-hosted proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read pages from a content type other than `page`.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    fn entries_url(&self, url: &str) -> Result<Url> {
        let query = serde_json::json!({ "url": url }).to_string();
        let endpoint = format!(
            "{}/v3/content_types/{}/entries",
            self.base_url, self.content_type
        );
        Url::parse_with_params(
            &endpoint,
            &[
                ("environment", self.config.environment.as_str()),
                ("query", query.as_str()),
            ],
        )
        .with_context(|| format!("invalid CMS endpoint: {endpoint}"))
    }
}

#[async_trait]
impl ContentSource for ContentstackClient {
    async fn page(&self, url: &str) -> Result<Option<Page>> {
        let endpoint = self.entries_url(url)?;
        tracing::debug!(%endpoint, "fetching page entry");

        let resp = self
            .client
            .get(endpoint)
            .header("api_key", &self.config.api_key)
            .header("access_token", &self.config.delivery_token)
            .send()
            .await
            .context("CMS request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("CMS API error ({}): {}", status, text);
        }

        let body: EntriesResponse = resp.json().await.context("malformed CMS response")?;
        Ok(body.entries.into_iter().next())
    }
}

#[derive(Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    entries: Vec<Page>,
}
