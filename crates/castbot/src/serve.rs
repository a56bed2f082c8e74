// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `castbot serve` command implementation.
//!
//! Opens storage, builds the platform client, runs the boot convergence
//! sequence, and then keeps the process alive until a shutdown signal. An
//! unconverged boot is logged, not fatal: the flags left set cause the
//! skipped work to retry on the next boot.

use castbot_config::model::CastbotConfig;
use castbot_core::CastbotError;
use castbot_messenger::MessengerClient;
use castbot_storage::Database;
use tracing::{error, info};

/// Runs the `castbot serve` command.
pub async fn run_serve(config: CastbotConfig) -> Result<(), CastbotError> {
    init_tracing(&config.agent.log_level);
    info!("starting castbot serve");

    let db = Database::open_with_wal(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let client = MessengerClient::new(&config.messenger).inspect_err(|e| {
        error!(error = %e, "failed to initialize platform client");
        eprintln!(
            "error: platform access token required. Set messenger.access_token \
             or the CASTBOT_MESSENGER_ACCESS_TOKEN environment variable."
        );
    })?;

    castbot_startup::run_startup(&db, &client, &config).await;

    info!("castbot is up, waiting for shutdown signal");
    wait_for_shutdown().await;

    db.close().await?;
    info!("castbot serve shutdown complete");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "failed to listen for shutdown signal");
    }
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("castbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
