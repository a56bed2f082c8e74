// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-label reconciliation.
//!
//! Binds every local channel to a remote broadcast label by name,
//! creating remote labels where none match. The remote label list is
//! fetched once per pass and treated as an immutable snapshot; the pass
//! is a single diff against that snapshot, not a transaction. Bindings
//! applied before a failure stay persisted, and the gating flag stays
//! set so the pass reruns on the next boot.

use castbot_core::CastbotError;
use castbot_messenger::{MessengerClient, RemoteLabel};
use castbot_storage::queries::channels;
use castbot_storage::{Channel, Database};
use tracing::{info, warn};

use crate::flags::{claim_and_run, CHANNELS_CHECK};

/// Run the reconciliation pass if its gate is open.
///
/// Returns whether the pass ran.
pub async fn reconcile_channels(
    db: &Database,
    client: &MessengerClient,
) -> Result<bool, CastbotError> {
    claim_and_run(db, CHANNELS_CHECK, || reconcile_pass(db, client)).await
}

async fn reconcile_pass(db: &Database, client: &MessengerClient) -> Result<(), CastbotError> {
    let locals = channels::list_channels(db).await?;
    let snapshot = client.list_labels().await?;
    let local_names: Vec<&str> = locals.iter().map(|c| c.name.as_str()).collect();

    for local in &locals {
        match &local.label_id {
            None => bind_unbound(db, client, &snapshot, local).await?,
            Some(label_id) => {
                audit_bound(db, client, &snapshot, &local_names, local, label_id).await?;
            }
        }
    }

    info!("every local channel is bound to a remote label");
    Ok(())
}

/// A never-bound channel adopts the remote label matching its name, or a
/// freshly created one.
async fn bind_unbound(
    db: &Database,
    client: &MessengerClient,
    snapshot: &[RemoteLabel],
    local: &Channel,
) -> Result<(), CastbotError> {
    let mut found = false;
    for remote in snapshot {
        if remote.name == local.name {
            channels::set_label_id(db, local.id, &remote.id).await?;
            found = true;
            break;
        }
    }

    if !found {
        info!(channel = %local.name, "no remote label with this name, creating one");
        let label_id = client.create_label(&local.name).await?;
        channels::set_label_id(db, local.id, &label_id).await?;
    }

    info!(channel = %local.name, "set label binding for channel");
    Ok(())
}

/// An already-bound channel is audited against every entry of the
/// snapshot; the scan never breaks early.
async fn audit_bound(
    db: &Database,
    client: &MessengerClient,
    snapshot: &[RemoteLabel],
    local_names: &[&str],
    local: &Channel,
    label_id: &str,
) -> Result<(), CastbotError> {
    for remote in snapshot {
        if remote.id == label_id && remote.name == local.name {
            continue;
        }
        if remote.name == local.name {
            // The label was recreated remotely under a new id; follow it.
            channels::set_label_id(db, local.id, &remote.id).await?;
            warn!(
                channel = %local.name,
                old = label_id,
                new = %remote.id,
                "label binding mismatch, rebound channel"
            );
        } else if local_names.contains(&remote.name.as_str()) {
            // A remote label carrying another local channel's name: this
            // channel is re-homed onto a fresh label of its own.
            let new_id = client.create_label(&local.name).await?;
            channels::set_label_id(db, local.id, &new_id).await?;
            info!(
                channel = %local.name,
                label = %new_id,
                "created new remote label for local channel"
            );
        }
    }
    Ok(())
}
