// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flag-gated job execution.
//!
//! Each convergence job is gated by a settings flag. The gate is claimed
//! with an atomic conditional update so two bot instances booting against
//! the same database cannot run the same job twice. The flag is written
//! back `"false"` only after the job's own state mutations completed, and
//! restored to `"true"` on failure, preserving retry-on-next-boot.

use std::future::Future;

use castbot_core::CastbotError;
use castbot_storage::queries::settings;
use castbot_storage::Database;
use tracing::{debug, error};

/// Gate for the channel-label reconciliation pass.
pub const CHANNELS_CHECK: &str = "channels_check";

/// Gate for the per-user channel membership sync.
pub const CHANNELS_SYNC_CHECK: &str = "channels_sync_check";

/// Gate for the lookup cache flush.
pub const FLUSH_CACHE: &str = "flush_cache";

/// Claim `flag` and run `job` under it.
///
/// Returns `Ok(true)` when the job ran to completion (the flag now reads
/// `"false"`), `Ok(false)` when the gate was closed or another instance
/// holds the claim. A job error restores the flag and propagates.
pub async fn claim_and_run<F, Fut>(
    db: &Database,
    flag: &str,
    job: F,
) -> Result<bool, CastbotError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), CastbotError>>,
{
    if !settings::claim_flag(db, flag).await? {
        debug!(flag, "job gate closed, skipping");
        return Ok(false);
    }

    match job().await {
        Ok(()) => {
            settings::write_flag(db, flag, false).await?;
            Ok(true)
        }
        Err(job_error) => {
            if let Err(restore_error) = settings::write_flag(db, flag, true).await {
                error!(
                    flag,
                    error = %restore_error,
                    "failed to restore flag after job failure"
                );
            }
            Err(job_error)
        }
    }
}
