// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boot-time reconciliation engine for the Castbot messenger bot.
//!
//! A fixed sequence of idempotent, flag-gated convergence jobs runs once
//! per process boot and brings local persisted state into agreement with
//! the remote platform: channel-to-label binding, per-user channel
//! membership, cache flushing, and the first-start marker. Jobs are gated
//! by flags in the settings store; a flag resets only after its job fully
//! completes, so an interrupted boot retries the work on the next one.

pub mod attachments;
pub mod batch;
pub mod flags;
pub mod housekeeping;
pub mod reconcile;
pub mod user_sync;

use castbot_config::CastbotConfig;
use castbot_core::CastbotError;
use castbot_messenger::MessengerClient;
use castbot_storage::queries::settings;
use castbot_storage::Database;
use tracing::{error, info};

pub use batch::{run_batch, BatchReport};
pub use flags::claim_and_run;
pub use user_sync::{ChannelSync, LabelMembershipSync};

/// Run the boot-time convergence sequence.
///
/// The first uncaught job error aborts the remaining steps for this boot;
/// it is logged rather than returned because an unconverged boot must not
/// take the host process down. Flags left set cause the skipped work to
/// retry on the next boot.
pub async fn run_startup(db: &Database, client: &MessengerClient, config: &CastbotConfig) {
    if let Err(error) = run_sequence(db, client, config).await {
        error!(
            error = %error,
            "startup sequence aborted; unconverged jobs retry next boot"
        );
    }
}

async fn run_sequence(
    db: &Database,
    client: &MessengerClient,
    config: &CastbotConfig,
) -> Result<(), CastbotError> {
    let restored = settings::reset_stale_claims(db).await?;
    if restored > 0 {
        info!(count = restored, "restored stale job claims from an interrupted boot");
    }

    housekeeping::write_nlp_credentials(&config.nlp)?;
    reconcile::reconcile_channels(db, client).await?;

    let membership = LabelMembershipSync::new(db, client);
    user_sync::sync_user_channels(db, &membership).await?;

    housekeeping::flush_cache(db).await?;
    housekeeping::mark_first_start(db).await?;

    info!("startup sequence complete");
    Ok(())
}
