// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event-log commands.

use crate::output::{print_json, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use ovs_storage::{EventsStore, StateLayout};

#[derive(Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    command: EventsCommands,
}

#[derive(Subcommand)]
enum EventsCommands {
    /// Show the most recent events
    Tail {
        #[arg(short = 'n', long, default_value_t = 50)]
        limit: usize,
        /// Only events of this type
        #[arg(long = "type")]
        event_type: Option<String>,
    },
}

pub fn execute(args: EventsArgs, layout: &StateLayout, output: OutputFormat) -> Result<()> {
    let store = EventsStore::open(layout)?;
    match args.command {
        EventsCommands::Tail { limit, event_type } => {
            let mut events = store.read_all()?;
            if let Some(wanted) = &event_type {
                events.retain(|e| &e.event_type == wanted);
            }
            let skip = events.len().saturating_sub(limit);
            let events = &events[skip..];
            match output {
                OutputFormat::Json => print_json(&events)?,
                OutputFormat::Text => {
                    for event in events {
                        println!(
                            "{}  [{}]  {}  {}",
                            event.created_at, event.level, event.agent_name, event.event_type
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
