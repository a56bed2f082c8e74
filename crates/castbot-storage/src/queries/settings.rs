// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings flag store.
//!
//! Flags gate the one-shot startup convergence jobs. A flag holds `"true"`
//! (work pending), `"false"` (converged), or `"running"` (claimed by an
//! in-flight job). Claims are atomic conditional updates so concurrent bot
//! instances cannot run the same job twice.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;

/// Textual form of a claimed flag.
const CLAIMED: &str = "running";

/// Read a flag's boolean value.
///
/// A missing row is a storage error: the seed migration creates every flag
/// the startup jobs consult, so absence means the store is corrupt.
pub async fn read_flag(db: &Database, name: &str) -> Result<bool, CastbotError> {
    let key = name.to_string();
    let value = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM settings WHERE name = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match value {
        Some(value) => Ok(value == "true"),
        None => Err(CastbotError::Storage {
            source: format!("settings flag `{name}` does not exist").into(),
        }),
    }
}

/// Write a flag in its canonical textual form.
pub async fn write_flag(db: &Database, name: &str, value: bool) -> Result<(), CastbotError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE settings SET value = ?1 WHERE name = ?2",
                params![if value { "true" } else { "false" }, name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically claim a flag that currently reads `"true"`.
///
/// Returns whether this caller won the claim. Losing means the flag was
/// already `"false"`, already claimed, or missing.
pub async fn claim_flag(db: &Database, name: &str) -> Result<bool, CastbotError> {
    let name = name.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            let updated = conn.execute(
                "UPDATE settings SET value = ?1 WHERE name = ?2 AND value = 'true'",
                params![CLAIMED, name],
            )?;
            Ok(updated)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(updated == 1)
}

/// Restore claims left behind by a crashed boot.
///
/// Any flag still reading `"running"` reverts to `"true"` so the
/// interrupted convergence work retries this boot. Returns the number of
/// flags restored.
pub async fn reset_stale_claims(db: &Database) -> Result<usize, CastbotError> {
    db.connection()
        .call(|conn| {
            let updated = conn.execute(
                "UPDATE settings SET value = 'true' WHERE value = ?1",
                params![CLAIMED],
            )?;
            Ok(updated)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn seeded_flags_read_true() {
        let (db, _dir) = setup_db().await;
        for flag in ["channels_check", "channels_sync_check", "flush_cache"] {
            assert!(read_flag(&db, flag).await.unwrap(), "{flag} should seed true");
        }
    }

    #[tokio::test]
    async fn write_flag_round_trips() {
        let (db, _dir) = setup_db().await;
        write_flag(&db, "flush_cache", false).await.unwrap();
        assert!(!read_flag(&db, "flush_cache").await.unwrap());
        write_flag(&db, "flush_cache", true).await.unwrap();
        assert!(read_flag(&db, "flush_cache").await.unwrap());
    }

    #[tokio::test]
    async fn missing_flag_is_an_error() {
        let (db, _dir) = setup_db().await;
        let result = read_flag(&db, "no_such_flag").await;
        assert!(result.is_err(), "missing flag row must propagate");
    }

    #[tokio::test]
    async fn claim_wins_once() {
        let (db, _dir) = setup_db().await;
        assert!(claim_flag(&db, "channels_check").await.unwrap());
        // Second claim loses: the flag now reads "running".
        assert!(!claim_flag(&db, "channels_check").await.unwrap());
        // A claimed flag is not "true".
        assert!(!read_flag(&db, "channels_check").await.unwrap());
    }

    #[tokio::test]
    async fn claim_loses_on_false_flag() {
        let (db, _dir) = setup_db().await;
        write_flag(&db, "flush_cache", false).await.unwrap();
        assert!(!claim_flag(&db, "flush_cache").await.unwrap());
    }

    #[tokio::test]
    async fn stale_claims_are_restored() {
        let (db, _dir) = setup_db().await;
        assert!(claim_flag(&db, "channels_check").await.unwrap());
        assert!(claim_flag(&db, "flush_cache").await.unwrap());

        let restored = reset_stale_claims(&db).await.unwrap();
        assert_eq!(restored, 2);
        assert!(read_flag(&db, "channels_check").await.unwrap());
        assert!(read_flag(&db, "flush_cache").await.unwrap());
    }
}
