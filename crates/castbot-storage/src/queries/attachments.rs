// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment CRUD operations.
//!
//! The selection predicate mirrors the upload job's contract: a record
//! needs processing iff `force_update` is set or it has never been
//! assigned a remote handle.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Attachment;

fn attachment_from_row(row: &rusqlite::Row<'_>) -> Result<Attachment, rusqlite::Error> {
    Ok(Attachment {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        attachment_id: row.get(3)?,
        force_update: row.get(4)?,
    })
}

/// List attachments that need (re)upload, in ascending-id order.
pub async fn list_needing_upload(db: &Database) -> Result<Vec<Attachment>, CastbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, url, attachment_id, force_update FROM attachments
                 WHERE force_update = 1 OR attachment_id IS NULL
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], |row| attachment_from_row(row))?;
            let mut attachments = Vec::new();
            for row in rows {
                attachments.push(row?);
            }
            Ok(attachments)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an attachment by id.
pub async fn get_attachment(db: &Database, id: i64) -> Result<Option<Attachment>, CastbotError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, url, attachment_id, force_update FROM attachments
                 WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| attachment_from_row(row));
            match result {
                Ok(attachment) => Ok(Some(attachment)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create an attachment record with no remote handle yet. Returns the new id.
pub async fn create_attachment(db: &Database, name: &str, url: &str) -> Result<i64, CastbotError> {
    let name = name.to_string();
    let url = url.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO attachments (name, url) VALUES (?1, ?2)",
                params![name, url],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record a successful upload: store the remote handle and clear the
/// demand flag in one write.
pub async fn mark_uploaded(
    db: &Database,
    id: i64,
    attachment_id: &str,
) -> Result<(), CastbotError> {
    let attachment_id = attachment_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE attachments SET attachment_id = ?1, force_update = 0 WHERE id = ?2",
                params![attachment_id, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set or clear the re-upload demand flag.
pub async fn set_force_update(db: &Database, id: i64, force: bool) -> Result<(), CastbotError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE attachments SET force_update = ?1 WHERE id = ?2",
                params![force, id],
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
    async fn fresh_attachment_is_selected() {
        let (db, _dir) = setup_db().await;
        create_attachment(&db, "welcome", "https://cdn.example.com/welcome.png")
            .await
            .unwrap();

        let pending = list_needing_upload(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "welcome");
    }

    #[tokio::test]
    async fn uploaded_attachment_is_not_selected() {
        let (db, _dir) = setup_db().await;
        let id = create_attachment(&db, "welcome", "https://cdn.example.com/welcome.png")
            .await
            .unwrap();
        mark_uploaded(&db, id, "998877").await.unwrap();

        assert!(list_needing_upload(&db).await.unwrap().is_empty());

        let attachment = get_attachment(&db, id).await.unwrap().unwrap();
        assert_eq!(attachment.attachment_id.as_deref(), Some("998877"));
        assert!(!attachment.force_update);
    }

    #[tokio::test]
    async fn force_update_reselects_uploaded_attachment() {
        let (db, _dir) = setup_db().await;
        let id = create_attachment(&db, "promo", "https://cdn.example.com/promo.mp4")
            .await
            .unwrap();
        mark_uploaded(&db, id, "112233").await.unwrap();
        set_force_update(&db, id, true).await.unwrap();

        let pending = list_needing_upload(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
    }
}
