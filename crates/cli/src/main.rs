// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vigil: edge device agent for the vision-analytics platform.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod config;
mod lock;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::config::AgentConfig;

#[derive(Parser)]
#[command(name = "vigil", version, about = "Vigil edge device agent")]
struct Cli {
    #[command(flatten)]
    config: AgentConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the agent: reconcile jobs and serve until interrupted
    Serve,
    /// Register this device with the control plane
    Register {
        /// Path to a JSON file with the operator access token
        info: PathBuf,
    },
    /// Unregister this device and clear local credentials
    Unregister,
    /// Manage locally stored job specs
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
}

#[derive(Subcommand)]
enum JobCommand {
    /// Add a job spec from a JSON file
    Add {
        /// Path to the job spec JSON
        spec: PathBuf,
    },
    /// List stored job specs
    List,
    /// Delete a job spec by UUID
    Delete { uuid: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = match cli.command {
        Command::Serve => commands::serve::run(&cli.config).await,
        Command::Register { info } => commands::register::register(&cli.config, &info).await,
        Command::Unregister => commands::register::unregister(&cli.config).await,
        Command::Job { command } => match command {
            JobCommand::Add { spec } => commands::job::add(&cli.config, &spec),
            JobCommand::List => commands::job::list(&cli.config),
            JobCommand::Delete { uuid } => commands::job::delete(&cli.config, &uuid),
        },
    };

    if let Err(e) = result {
        error!("fatal: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
