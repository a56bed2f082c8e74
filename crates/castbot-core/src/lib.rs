// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Castbot messenger bot.
//!
//! Provides the error type and small shared domain types used throughout
//! the Castbot workspace.

pub mod error;
pub mod types;

pub use error::CastbotError;
pub use types::MediaKind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castbot_error_has_all_variants() {
        let _config = CastbotError::Config("test".into());
        let _storage = CastbotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _platform = CastbotError::Platform {
            message: "test".into(),
            source: None,
        };
        let _internal = CastbotError::Internal("test".into());
    }

    #[test]
    fn media_kind_round_trips_through_strings() {
        use std::str::FromStr;

        for kind in [MediaKind::Image, MediaKind::Video] {
            let s = kind.to_string();
            let parsed = MediaKind::from_str(&s).expect("should parse back");
            assert_eq!(kind, parsed);
        }
    }
}
