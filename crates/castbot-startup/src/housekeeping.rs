// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small one-shot boot jobs: NLP credential materialization, cache flush,
//! and the first-start marker.

use std::path::Path;

use castbot_config::model::NlpConfig;
use castbot_core::CastbotError;
use castbot_storage::queries::{bot_data, cache};
use castbot_storage::Database;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::flags::{claim_and_run, FLUSH_CACHE};

/// Name of the first-start marker record in `bot_data`.
const FIRST_START: &str = "first_start";

/// Materialize the NLP service-account credentials file.
///
/// The external intent-detection service reads its credentials from disk;
/// any stale file is replaced on every boot. No-op when the integration is
/// disabled.
pub fn write_nlp_credentials(nlp: &NlpConfig) -> Result<(), CastbotError> {
    if !nlp.enabled {
        return Ok(());
    }

    let raw = nlp.credentials_json.as_deref().ok_or_else(|| {
        CastbotError::Config(
            "nlp.credentials_json is required when the NLP integration is enabled".into(),
        )
    })?;
    serde_json::from_str::<serde_json::Value>(raw).map_err(|e| {
        CastbotError::Config(format!("nlp.credentials_json is not valid JSON: {e}"))
    })?;

    let path = Path::new(&nlp.credentials_path);
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| {
            CastbotError::Internal(format!("failed to remove stale credentials file: {e}"))
        })?;
    }
    std::fs::write(path, raw).map_err(|e| {
        CastbotError::Internal(format!("failed to write credentials file: {e}"))
    })?;

    info!(path = %nlp.credentials_path, "wrote NLP service credentials");
    Ok(())
}

/// Flush the lookup cache if the gate is open.
///
/// Returns whether the flush ran.
pub async fn flush_cache(db: &Database) -> Result<bool, CastbotError> {
    claim_and_run(db, FLUSH_CACHE, || async {
        info!("flushing lookup cache");
        let removed = cache::flush_all(db).await?;
        debug!(entries = removed, "lookup cache flushed");
        Ok(())
    })
    .await
}

/// Record the bot's first start, or backfill a marker missing its timestamp.
///
/// Unconditional and idempotent: the record's existence is itself the gate.
pub async fn mark_first_start(db: &Database) -> Result<(), CastbotError> {
    match bot_data::get(db, FIRST_START).await? {
        None => {
            info!("saving first start date");
            let data = json!({ "timestamp": Utc::now().timestamp_millis() });
            bot_data::insert(db, FIRST_START, false, &data).await
        }
        Some(entry)
            if entry
                .data
                .get("timestamp")
                .is_none_or(serde_json::Value::is_null) =>
        {
            info!("backfilling first start date");
            let data = json!({ "timestamp": Utc::now().timestamp_millis() });
            bot_data::update_data(db, FIRST_START, &data).await
        }
        Some(_) => Ok(()),
    }
}
