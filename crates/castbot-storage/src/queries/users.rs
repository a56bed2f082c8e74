// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User and channel-subscription operations.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Channel, User};

/// List all users in ascending-id order.
///
/// Deterministic iteration keeps the per-user sync logs reproducible.
pub async fn list_users(db: &Database) -> Result<Vec<User>, CastbotError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, messenger_id, locale FROM users ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok(User {
                    id: row.get(0)?,
                    messenger_id: row.get(1)?,
                    locale: row.get(2)?,
                })
            })?;
            let mut users = Vec::new();
            for row in rows {
                users.push(row?);
            }
            Ok(users)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create a user. Returns the new id.
pub async fn create_user(db: &Database, messenger_id: &str) -> Result<i64, CastbotError> {
    let messenger_id = messenger_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (messenger_id) VALUES (?1)",
                params![messenger_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Subscribe a user to a channel. Idempotent.
pub async fn subscribe(db: &Database, user_id: i64, channel_id: i64) -> Result<(), CastbotError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO user_channels (user_id, channel_id) VALUES (?1, ?2)",
                params![user_id, channel_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The channels a user subscribes to, in ascending-id order.
pub async fn subscribed_channels(
    db: &Database,
    user_id: i64,
) -> Result<Vec<Channel>, CastbotError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.label_id FROM channels c
                 JOIN user_channels uc ON uc.channel_id = c.id
                 WHERE uc.user_id = ?1
                 ORDER BY c.id ASC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::channels;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn list_users_is_id_ordered() {
        let (db, _dir) = setup_db().await;
        create_user(&db, "psid-b").await.unwrap();
        create_user(&db, "psid-a").await.unwrap();

        let users = list_users(&db).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].messenger_id, "psid-b");
        assert_eq!(users[1].messenger_id, "psid-a");
        assert!(users[0].id < users[1].id);
    }

    #[tokio::test]
    async fn duplicate_messenger_id_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_user(&db, "psid-1").await.unwrap();
        assert!(create_user(&db, "psid-1").await.is_err());
    }

    #[tokio::test]
    async fn subscriptions_join_back_to_channels() {
        let (db, _dir) = setup_db().await;
        let user = create_user(&db, "psid-1").await.unwrap();
        let news = channels::create_channel(&db, "news").await.unwrap();
        let promos = channels::create_channel(&db, "promos").await.unwrap();
        channels::set_label_id(&db, news, "55").await.unwrap();

        subscribe(&db, user, news).await.unwrap();
        subscribe(&db, user, news).await.unwrap(); // idempotent
        subscribe(&db, user, promos).await.unwrap();

        let subs = subscribed_channels(&db, user).await.unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name, "news");
        assert_eq!(subs[0].label_id.as_deref(), Some("55"));
        assert_eq!(subs[1].name, "promos");
        assert!(subs[1].label_id.is_none());
    }
}
