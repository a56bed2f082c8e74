// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-item failure-isolating batch execution.
//!
//! The runner traverses the whole sequence, strictly sequentially; a
//! failing item is logged and counted, never short-circuits the rest.
//! Sequential execution keeps the remote API unburst and makes error
//! attribution per-item unambiguous.

use std::future::Future;

use castbot_core::CastbotError;
use tracing::warn;

/// Aggregate outcome of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Items traversed. Always equals the input length.
    pub processed: usize,
    /// Items whose action failed. Exact: one per failing item.
    pub errors: usize,
}

impl BatchReport {
    /// True when every item succeeded.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Run `action` for every item, isolating per-item failures.
///
/// The runner itself never fails; obtaining the input sequence is the
/// caller's responsibility.
pub async fn run_batch<I, T, F, Fut>(items: I, mut action: F) -> BatchReport
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), CastbotError>>,
{
    let mut report = BatchReport::default();
    for (index, item) in items.into_iter().enumerate() {
        report.processed += 1;
        if let Err(error) = action(item).await {
            warn!(item = index, error = %error, "batch item failed, continuing");
            report.errors += 1;
        }
    }
    report
}
