pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One dispatched request, as shown in the editor's history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub operation: String,
    pub text: String,
    pub result: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// What gets written after a dispatch.
#[derive(Debug, Clone)]
pub struct NewEntry<'a> {
    pub user: &'a str,
    pub operation: &'a str,
    pub text: &'a str,
    pub result: &'a str,
}

/// Per-user record of past requests. Could be in-memory, SQLite, etc.
#[async_trait]
pub trait History: Send + Sync {
    async fn record(&self, entry: NewEntry<'_>) -> Result<()>;
    /// Newest first, at most `limit` entries.
    async fn recent(&self, user: &str, limit: usize) -> Result<Vec<HistoryEntry>>;
    async fn clear(&self, user: &str) -> Result<()>;
}
