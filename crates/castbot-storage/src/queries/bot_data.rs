// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent bot data records with JSON payloads.
//!
//! Holds process-lifecycle markers such as `first_start`.

use castbot_core::CastbotError;
use rusqlite::params;

use crate::database::Database;
use crate::models::BotDataEntry;

/// Get a bot data record by name.
pub async fn get(db: &Database, name: &str) -> Result<Option<BotDataEntry>, CastbotError> {
    let name = name.to_string();
    let row = db
        .connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT name, editable, data FROM bot_data WHERE name = ?1")?;
            let result = stmt.query_row(params![name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                ))
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match row {
        Some((name, editable, data)) => {
            let data = serde_json::from_str(&data).map_err(|e| CastbotError::Storage {
                source: Box::new(e),
            })?;
            Ok(Some(BotDataEntry {
                name,
                editable,
                data,
            }))
        }
        None => Ok(None),
    }
}

/// Insert a bot data record.
pub async fn insert(
    db: &Database,
    name: &str,
    editable: bool,
    data: &serde_json::Value,
) -> Result<(), CastbotError> {
    let name = name.to_string();
    let data = data.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_data (name, editable, data) VALUES (?1, ?2, ?3)",
                params![name, editable, data],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the JSON payload of an existing record.
pub async fn update_data(
    db: &Database,
    name: &str,
    data: &serde_json::Value,
) -> Result<(), CastbotError> {
    let name = name.to_string();
    let data = data.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE bot_data SET data = ?1 WHERE name = ?2",
                params![data, name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
