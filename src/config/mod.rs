//! Key-value settings storage backed by SQLite.
//!
//! Shares a database with [`SqliteHistory`](crate::history::sqlite::SqliteHistory);
//! pass the same path to both.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::Mutex;

use crate::auth::SessionSigner;

const SESSION_SECRET_KEY: &str = "session_secret";

/// Persistent key-value settings store.
pub struct Settings {
    conn: Mutex<Connection>,
}

impl Settings {
    /// Open or create the settings table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open settings database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create settings table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a setting by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a setting (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// The session signing secret. An explicit secret wins; otherwise one is
    /// generated on first use and persisted so sessions survive restarts.
    pub fn session_secret(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(secret) = explicit
            && !secret.is_empty()
        {
            return Ok(secret.to_string());
        }

        if let Some(secret) = self.get(SESSION_SECRET_KEY)? {
            return Ok(secret);
        }

        let secret = SessionSigner::generate_secret();
        self.set(SESSION_SECRET_KEY, &secret)
            .context("failed to persist session secret")?;
        tracing::info!("generated new session secret");
        Ok(secret)
    }
}
