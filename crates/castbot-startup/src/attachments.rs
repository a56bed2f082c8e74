// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment (re)upload.
//!
//! Selection is by row predicate rather than a settings flag: a record is
//! due iff it demands re-upload or has never been given a remote handle.
//! A failed row is left untouched and stays selected for the next pass.

use castbot_core::CastbotError;
use castbot_messenger::{media_kind_for_url, MessengerClient};
use castbot_storage::queries::attachments;
use castbot_storage::{Attachment, Database};
use tracing::{info, warn};

use crate::batch::{run_batch, BatchReport};

/// Upload every attachment that needs it.
///
/// Failures are isolated per attachment; the report carries the exact
/// failure count.
pub async fn check_attachments(
    db: &Database,
    client: &MessengerClient,
) -> Result<BatchReport, CastbotError> {
    let pending = attachments::list_needing_upload(db).await?;
    if pending.is_empty() {
        info!("all attachments up to date");
        return Ok(BatchReport::default());
    }

    info!(count = pending.len(), "attachments to update, starting upload");

    let report = run_batch(pending, |attachment| async move {
        upload_one(db, client, &attachment).await?;
        info!(attachment = %attachment.name, "uploaded");
        Ok(())
    })
    .await;

    if report.is_clean() {
        info!("all attachment updates finished");
    } else {
        warn!(errors = report.errors, "attachment updates finished with errors");
    }
    Ok(report)
}

async fn upload_one(
    db: &Database,
    client: &MessengerClient,
    attachment: &Attachment,
) -> Result<(), CastbotError> {
    let kind = media_kind_for_url(&attachment.url)?;
    let remote_id = client.upload_from_url(kind, &attachment.url).await?;
    attachments::mark_uploaded(db, attachment.id, &remote_id).await
}
