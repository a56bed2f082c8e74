// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./castbot.toml` > `~/.config/castbot/castbot.toml`
//! > `/etc/castbot/castbot.toml` with environment variable overrides via the
//! `CASTBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CastbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/castbot/castbot.toml` (system-wide)
/// 3. `~/.config/castbot/castbot.toml` (user XDG config)
/// 4. `./castbot.toml` (local directory)
/// 5. `CASTBOT_*` environment variables
pub fn load_config() -> Result<CastbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CastbotConfig::default()))
        .merge(Toml::file("/etc/castbot/castbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("castbot/castbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("castbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CastbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CastbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CastbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CastbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CASTBOT_MESSENGER_ACCESS_TOKEN`
/// must map to `messenger.access_token`, not `messenger.access.token`.
fn env_provider() -> Env {
    Env::prefixed("CASTBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CASTBOT_MESSENGER_ACCESS_TOKEN -> "messenger_access_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("messenger_", "messenger.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("nlp_", "nlp.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "castbot");
        assert!(config.messenger.access_token.is_none());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = load_config_from_str(
            r#"
            [agent]
            name = "broadcaster"
            log_level = "debug"

            [messenger]
            access_token = "EAAtoken"

            [storage]
            database_path = "/tmp/castbot-test.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.name, "broadcaster");
        assert_eq!(config.agent.log_level, "debug");
        assert_eq!(config.messenger.access_token.as_deref(), Some("EAAtoken"));
        assert_eq!(config.storage.database_path, "/tmp/castbot-test.db");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [agent]
            nmae = "typo"
            "#,
        );
        assert!(result.is_err(), "unknown key should be rejected");
    }

    #[test]
    #[serial]
    fn env_vars_override_file_values() {
        // SAFETY: test is serialized; no other thread reads the environment.
        unsafe {
            std::env::set_var("CASTBOT_MESSENGER_ACCESS_TOKEN", "env-token");
            std::env::set_var("CASTBOT_AGENT_LOG_LEVEL", "trace");
        }

        let config = Figment::new()
            .merge(Serialized::defaults(CastbotConfig::default()))
            .merge(env_provider())
            .extract::<CastbotConfig>()
            .unwrap();

        unsafe {
            std::env::remove_var("CASTBOT_MESSENGER_ACCESS_TOKEN");
            std::env::remove_var("CASTBOT_AGENT_LOG_LEVEL");
        }

        assert_eq!(config.messenger.access_token.as_deref(), Some("env-token"));
        assert_eq!(config.agent.log_level, "trace");
    }
}
