// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Castbot workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of media hosted on the remote platform.
///
/// The textual form is the `type` field of the platform's attachment
/// upload payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}
