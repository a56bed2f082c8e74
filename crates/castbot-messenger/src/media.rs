// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media kind derivation from attachment URLs.

use std::sync::LazyLock;

use castbot_core::{CastbotError, MediaKind};
use regex::Regex;

/// Trailing file extension: a dot followed by word characters at the very
/// end of the URL. A query string or fragment after the extension defeats
/// the match, as does a bare path.
static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\w*$").expect("extension pattern compiles"));

/// Derive the upload kind from a URL's trailing file extension.
///
/// The known image extensions map to [`MediaKind::Image`]; any other
/// extension is assumed to be video. A URL without a trailing extension is
/// an error and fails the item it belongs to.
pub fn media_kind_for_url(url: &str) -> Result<MediaKind, CastbotError> {
    let ext = EXTENSION.find(url).ok_or_else(|| CastbotError::Platform {
        message: format!("no trailing file extension in attachment url `{url}`"),
        source: None,
    })?;

    match ext.as_str() {
        ".jpg" | ".jpeg" | ".png" | ".gif" => Ok(MediaKind::Image),
        _ => Ok(MediaKind::Video),
    }
}
