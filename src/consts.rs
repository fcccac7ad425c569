//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default OpenAI model when none is specified.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Anthropic model when none is specified.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Returned when the completion service answers without content.
pub const NO_RESULT: &str = "No result from AI.";

/// Returned for any failure past input validation.
pub const PROCESSING_ERROR: &str = "Error processing request";

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "editsync.session-token";

/// Session lifetime in milliseconds (30 days).
pub const SESSION_TTL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Maximum number of history entries returned per request.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Default database path: `~/.editsync/editsync.db`.
/// Single DB for settings and edit history.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .expect("cannot determine home directory")
        .join(".editsync")
        .join("editsync.db")
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis() as u64
}
