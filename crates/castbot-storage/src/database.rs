// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Query modules accept `&Database` and call through
//! `database.connection().call()`. Do NOT create additional Connection
//! instances for writes.

use std::path::Path;
use std::time::Duration;

use castbot_core::CastbotError;
use tracing::debug;

/// Handle to the bot's SQLite database.
///
/// Opening runs all pending migrations and configures WAL journaling,
/// foreign keys, and a busy timeout.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations.
    pub async fn open(path: &str) -> Result<Self, CastbotError> {
        Self::open_with_wal(path, true).await
    }

    /// Open with explicit control over WAL journaling.
    pub async fn open_with_wal(path: &str, wal_mode: bool) -> Result<Self, CastbotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CastbotError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| CastbotError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            if wal_mode {
                // journal_mode returns a result row; discard it.
                conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| CastbotError::Storage {
                source: Box::new(e),
            })?;

        debug!(path, "database opened and migrated");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), CastbotError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> CastbotError {
    CastbotError::Storage {
        source: Box::new(e),
    }
}
