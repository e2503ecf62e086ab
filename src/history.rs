use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::SessionSummary;

/// SQLite log of finished sessions
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at the default state location
    pub fn new() -> Result<Self> {
        let path = AppDirs::history_path().unwrap_or_else(|| PathBuf::from("arena_tap_history.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                finished_at TEXT NOT NULL,
                round_secs INTEGER NOT NULL,
                score INTEGER NOT NULL,
                hits INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                avg_reaction_ms REAL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_round ON sessions(round_secs, score)",
            [],
        )?;

        Ok(Self { conn })
    }

    pub fn record(&self, summary: &SessionSummary) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (finished_at, round_secs, score, hits, accuracy, avg_reaction_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                summary.finished_at.to_rfc3339(),
                summary.round_secs,
                summary.score,
                summary.hits,
                summary.accuracy,
                summary.avg_reaction_ms,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Highest score for rounds of the given length
    pub fn best_score(&self, round_secs: u32) -> Result<Option<u32>> {
        let best = self.conn.query_row(
            "SELECT MAX(score) FROM sessions WHERE round_secs = ?1",
            [round_secs],
            |row| row.get(0),
        )?;
        Ok(best)
    }

    pub fn session_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Most recent sessions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT finished_at, round_secs, score, hits, accuracy, avg_reaction_ms
            FROM sessions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let finished_at: String = row.get(0)?;
            let finished_at = DateTime::parse_from_rfc3339(&finished_at)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionSummary {
                finished_at,
                round_secs: row.get(1)?,
                score: row.get(2)?,
                hits: row.get(3)?,
                accuracy: row.get(4)?,
                avg_reaction_ms: row.get(5)?,
            })
        })?;

        let mut sessions = Vec::new();
        for session in rows {
            sessions.push(session?);
        }
        Ok(sessions)
    }
}
