// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Castbot - a broadcast messenger bot.
//!
//! This is the binary entry point for the Castbot process.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod maintenance;
mod serve;

use clap::{Parser, Subcommand};

/// Castbot - a broadcast messenger bot.
#[derive(Parser, Debug)]
#[command(name = "castbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot: run the boot convergence sequence, then serve.
    Serve,
    /// Run the boot convergence sequence once and exit.
    Startup,
    /// Upload attachments that demand (re)hosting, then exit.
    Attachments,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match castbot_config::load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("castbot: configuration error: {error}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Startup) => maintenance::run_startup_once(config).await,
        Some(Commands::Attachments) => maintenance::run_attachments(config).await,
        None => {
            println!("castbot: use --help for available commands");
            return;
        }
    };

    if let Err(error) = result {
        eprintln!("castbot: {error}");
        std::process::exit(1);
    }
}
