use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{Connection, params};
use std::sync::Mutex;

use super::{History, HistoryEntry, NewEntry};

/// SQLite-backed edit history.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL DEFAULT (datetime('now')),
                user TEXT NOT NULL,
                operation TEXT NOT NULL,
                text TEXT NOT NULL,
                result TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS history_user ON history (user, id);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }
}

#[async_trait]
impl History for SqliteHistory {
    async fn record(&self, entry: NewEntry<'_>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (user, operation, text, result) VALUES (?1, ?2, ?3, ?4)",
            [entry.user, entry.operation, entry.text, entry.result],
        )?;
        Ok(())
    }

    async fn recent(&self, user: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, operation, text, result, timestamp FROM history
             WHERE user = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(params![user, i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok(HistoryEntry {
                    id: row.get(0)?,
                    operation: row.get(1)?,
                    text: row.get(2)?,
                    result: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn clear(&self, user: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM history WHERE user = ?1", [user])?;
        Ok(())
    }
}
