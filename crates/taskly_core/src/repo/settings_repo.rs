//! Durable key-value settings flags.
//!
//! # Responsibility
//! - Persist the small boolean flags the app reads at startup
//!   (premium entitlement, one-shot delete hint).
//!
//! # Invariants
//! - Missing keys read as `false`.
//! - Writes upsert; the last write wins.

use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for durable boolean flags.
pub trait SettingsRepository {
    /// Reads one flag; missing keys are `false`.
    fn flag(&self, key: &str) -> RepoResult<bool>;
    /// Upserts one flag.
    fn set_flag(&self, key: &str, value: bool) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn flag(&self, key: &str) -> RepoResult<bool> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match value.as_deref() {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(RepoError::InvalidData(format!(
                "invalid flag value `{other}` in settings.value for key `{key}`"
            ))),
        }
    }

    fn set_flag(&self, key: &str, value: bool) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, if value { "true" } else { "false" }],
        )?;

        Ok(())
    }
}
