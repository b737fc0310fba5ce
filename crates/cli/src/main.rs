// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ovs - Overstory CLI
//!
//! The surface worker agents (and operators) use to talk to the
//! coordination stores: mail, sessions, nudges, run tracking, events.
//! Everything operates directly on the durable state directory; the
//! supervisor daemon (`ovsd`) is never in the request path.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{events, mail, nudge, run, session};
use output::OutputFormat;
use ovs_storage::StateLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ovs",
    version,
    about = "Overstory - multi-agent orchestration for one repository"
)]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inter-agent mail
    Mail(mail::MailArgs),
    /// Agent session records
    Session(session::SessionArgs),
    /// Out-of-band attention markers
    Nudge(nudge::NudgeArgs),
    /// Active-run pointer
    Run(run::RunArgs),
    /// Structured event log
    Events(events::EventsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }
    let project_root = std::env::current_dir()?;
    let layout = StateLayout::discover(&project_root);

    match cli.command {
        Commands::Mail(args) => mail::execute(args, &layout, cli.output).await,
        Commands::Session(args) => session::execute(args, &layout, cli.output),
        Commands::Nudge(args) => nudge::execute(args, &layout, cli.output),
        Commands::Run(args) => run::execute(args, &layout),
        Commands::Events(args) => events::execute(args, &layout, cli.output),
    }
}
