// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lookup cache.
//!
//! A plain key-value table used to memoize expensive lookups across
//! boots. The startup cache-flush job empties it wholesale.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;

/// Store a cache entry, replacing any existing value for the key.
pub async fn put(db: &Database, key: &str, value: &str) -> Result<(), CastbotError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO cache (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a cache entry.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, CastbotError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM cache WHERE key = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove every cache entry. Returns the number of rows removed.
pub async fn flush_all(db: &Database) -> Result<usize, CastbotError> {
    db.connection()
        .call(|conn| {
            let removed = conn.execute("DELETE FROM cache", [])?;
            Ok(removed)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
