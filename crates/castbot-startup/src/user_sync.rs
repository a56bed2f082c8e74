// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user channel membership sync.
//!
//! Walks every known user and delegates to a convergence routine behind
//! the [`ChannelSync`] seam. Per-user failures are isolated by the batch
//! runner; the job's gate resets once the traversal completes, regardless
//! of the aggregate error count.

use async_trait::async_trait;
use castbot_core::CastbotError;
use castbot_messenger::MessengerClient;
use castbot_storage::queries::users;
use castbot_storage::{Database, User};
use tracing::{debug, info};

use crate::batch::run_batch;
use crate::flags::{claim_and_run, CHANNELS_SYNC_CHECK};

/// Converges one user's remote state with local records.
#[async_trait]
pub trait ChannelSync: Send + Sync {
    async fn sync_user(&self, user: &User) -> Result<(), CastbotError>;
}

/// Default convergence routine: subscribe the user to the remote label of
/// every bound channel they belong to.
pub struct LabelMembershipSync<'a> {
    db: &'a Database,
    client: &'a MessengerClient,
}

impl<'a> LabelMembershipSync<'a> {
    pub fn new(db: &'a Database, client: &'a MessengerClient) -> Self {
        Self { db, client }
    }
}

#[async_trait]
impl ChannelSync for LabelMembershipSync<'_> {
    async fn sync_user(&self, user: &User) -> Result<(), CastbotError> {
        let channels = users::subscribed_channels(self.db, user.id).await?;
        for channel in &channels {
            if let Some(label_id) = &channel.label_id {
                self.client
                    .add_user_to_label(label_id, &user.messenger_id)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Run the per-user sync job if its gate is open.
///
/// Returns whether the traversal ran.
pub async fn sync_user_channels(
    db: &Database,
    sync: &dyn ChannelSync,
) -> Result<bool, CastbotError> {
    claim_and_run(db, CHANNELS_SYNC_CHECK, || async {
        let all_users = users::list_users(db).await?;
        info!(
            count = all_users.len(),
            "checking channel sync for all users, this can take a while"
        );

        let report = run_batch(all_users, |user| async move {
            debug!(user_id = user.id, "syncing channel membership");
            sync.sync_user(&user).await
        })
        .await;

        info!(errors = report.errors, "channel sync finished");
        Ok(())
    })
    .await
}
