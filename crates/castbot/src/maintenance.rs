// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot maintenance commands: `castbot startup` and `castbot attachments`.
//!
//! Both open storage and the platform client, run their job, and exit.
//! The attachment pass is also what the admin surface triggers after
//! editing attachment records.

use castbot_config::model::CastbotConfig;
use castbot_core::CastbotError;
use castbot_messenger::MessengerClient;
use castbot_storage::Database;
use tracing::info;

use crate::serve::init_tracing;

/// Run the boot convergence sequence once and exit.
pub async fn run_startup_once(config: CastbotConfig) -> Result<(), CastbotError> {
    init_tracing(&config.agent.log_level);

    let db = Database::open_with_wal(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let client = MessengerClient::new(&config.messenger)?;

    castbot_startup::run_startup(&db, &client, &config).await;

    db.close().await
}

/// Run the attachment upload pass and exit.
///
/// A nonzero per-item error count is reported but does not fail the
/// command; failed rows stay selected for the next pass.
pub async fn run_attachments(config: CastbotConfig) -> Result<(), CastbotError> {
    init_tracing(&config.agent.log_level);

    let db = Database::open_with_wal(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let client = MessengerClient::new(&config.messenger)?;

    let report = castbot_startup::attachments::check_attachments(&db, &client).await?;
    info!(
        processed = report.processed,
        errors = report.errors,
        "attachment pass finished"
    );

    db.close().await
}
