// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel CRUD operations.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Channel;

/// List all channels in ascending-id order.
pub async fn list_channels(db: &Database) -> Result<Vec<Channel>, CastbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, label_id FROM channels ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok(Channel {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    label_id: row.get(2)?,
                })
            })?;
            let mut channels = Vec::new();
            for row in rows {
                channels.push(row?);
            }
            Ok(channels)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a channel by id.
pub async fn get_channel(db: &Database, id: i64) -> Result<Option<Channel>, CastbotError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, label_id FROM channels WHERE id = ?1")?;
            let result = stmt.query_row(params![id], |row| {
                Ok(Channel {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    label_id: row.get(2)?,
                })
            });
            match result {
                Ok(channel) => Ok(Some(channel)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create a channel with no remote binding. Returns the new id.
pub async fn create_channel(db: &Database, name: &str) -> Result<i64, CastbotError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("INSERT INTO channels (name) VALUES (?1)", params![name])?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Bind a channel to a remote label.
pub async fn set_label_id(db: &Database, id: i64, label_id: &str) -> Result<(), CastbotError> {
    let label_id = label_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE channels SET label_id = ?1 WHERE id = ?2",
                params![label_id, id],
            )?;
            Ok(())
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
    async fn create_and_list_channels_in_id_order() {
        let (db, _dir) = setup_db().await;
        let news = create_channel(&db, "news").await.unwrap();
        let promos = create_channel(&db, "promos").await.unwrap();
        assert!(news < promos);

        let channels = list_channels(&db).await.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "news");
        assert_eq!(channels[1].name, "promos");
        assert!(channels.iter().all(|c| c.label_id.is_none()));
    }

    #[tokio::test]
    async fn set_label_id_binds_channel() {
        let (db, _dir) = setup_db().await;
        let id = create_channel(&db, "news").await.unwrap();

        set_label_id(&db, id, "1234567890").await.unwrap();

        let channel = get_channel(&db, id).await.unwrap().unwrap();
        assert_eq!(channel.label_id.as_deref(), Some("1234567890"));
    }

    #[tokio::test]
    async fn duplicate_channel_name_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_channel(&db, "news").await.unwrap();
        assert!(create_channel(&db, "news").await.is_err());
    }

    #[tokio::test]
    async fn get_nonexistent_channel_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_channel(&db, 42).await.unwrap().is_none());
    }
}
