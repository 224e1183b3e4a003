// ABOUTME: pierre-insights - command-line tool for seeding rules and replaying activities
// ABOUTME: Runs the classification and baseline pipeline against in-memory stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Seed default rules for a user (all standard activity types)
//! pierre-insights seed --user 6f1c7a52-8d0e-4c55-9a7b-0b6a2a7b1f10
//!
//! # Seed only runs and rides
//! pierre-insights seed --user 6f1c7a52-8d0e-4c55-9a7b-0b6a2a7b1f10 --kind run --kind ride
//!
//! # Classify an activity against the default rules
//! pierre-insights classify --file activity.json
//!
//! # Replay a history of activities through the full pipeline
//! pierre-insights replay --file activities.json
//!
//! # Print the default rules for an activity type
//! pierre-insights rules --kind "trail run"
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pierre_activity_insights::config::ServerConfig;
use pierre_activity_insights::logging::LoggingConfig;
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "pierre-insights",
    about = "Pierre activity insights CLI",
    long_about = "Seed category rules, classify activities, and replay activity histories through the baseline and insight pipeline."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Seed default category rules for a user
    Seed {
        /// User to seed
        #[arg(long)]
        user: Uuid,

        /// Activity types to seed (repeatable, defaults to every standard type)
        #[arg(long = "kind")]
        kinds: Vec<String>,
    },

    /// Classify activities against the default rules without storing anything
    Classify {
        /// JSON file holding one activity or an array of activities
        #[arg(long)]
        file: PathBuf,
    },

    /// Run activities through the full pipeline, in file order
    Replay {
        /// JSON file holding an array of activities
        #[arg(long)]
        file: PathBuf,

        /// Skip insight rendering even when an API key is configured
        #[arg(long)]
        no_insights: bool,
    },

    /// Print the default rules for an activity type
    Rules {
        /// Activity type name (e.g. "run", "Trail Run", "weight_training")
        #[arg(long)]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init().context("failed to initialize logging")?;

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let rules = config
        .load_rule_config()
        .await
        .context("failed to load rule configuration")?;
    debug!(groups = rules.groups.len(), "rule configuration ready");

    let result = match cli.command {
        Command::Seed { user, kinds } => commands::seed::run(rules, user, &kinds).await,
        Command::Classify { file } => commands::classify::run(&rules, &file).await,
        Command::Replay { file, no_insights } => {
            commands::replay::run(&config, rules, &file, !no_insights).await
        }
        Command::Rules { kind } => commands::rules::run(&rules, &kind),
    };
    if let Err(error) = &result {
        helpers::display::print_app_error(error);
    }
    result
}
