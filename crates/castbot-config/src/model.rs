// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Castbot messenger bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Castbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CastbotConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Remote messaging platform settings.
    #[serde(default)]
    pub messenger: MessengerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// NLP fallback integration settings.
    #[serde(default)]
    pub nlp: NlpConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "castbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote messaging platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessengerConfig {
    /// Page access token for the platform API. `None` disables all remote calls.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Base URL of the platform's graph API, including the version segment.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("castbot").join("castbot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("castbot.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// NLP fallback integration configuration.
///
/// When enabled, the startup sequence materializes the service-account
/// credentials file required by the external intent-detection service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NlpConfig {
    /// Enable the NLP fallback integration.
    #[serde(default)]
    pub enabled: bool,

    /// Service-account credentials as a JSON document. Required when enabled.
    #[serde(default)]
    pub credentials_json: Option<String>,

    /// Path the credentials file is written to at startup.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            credentials_json: None,
            credentials_path: default_credentials_path(),
        }
    }
}

fn default_credentials_path() -> String {
    "./nlp_credentials.json".to_string()
}
