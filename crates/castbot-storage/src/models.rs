// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.

use serde::{Deserialize, Serialize};

/// A broadcast audience segment owned by the bot.
///
/// `label_id` is the binding to the remote platform label; `None` means the
/// channel has never been bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub label_id: Option<String>,
}

/// A media item to be hosted on the remote platform.
///
/// A record needs (re)upload iff `force_update` is set or `attachment_id`
/// is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub attachment_id: Option<String>,
    pub force_update: bool,
}

/// A bot user, keyed by the platform-assigned messenger id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub messenger_id: String,
    pub locale: Option<String>,
}

/// A persistent bot data record with a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotDataEntry {
    pub name: String,
    pub editable: bool,
    pub data: serde_json::Value,
}
