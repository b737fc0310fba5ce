// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nudge commands: the out-of-band attention channel.
//!
//! A nudge is a marker file, never keystrokes into the recipient's
//! terminal. `send` writes the marker (subject to the mail-check
//! debounce unless forced); `check` is the recipient's read-and-clear
//! poll.

use crate::output::{print_json, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use ovs_core::{Clock, NudgeMarker, SystemClock};
use ovs_engine::NudgeSender;
use ovs_storage::{NudgeStore, StateLayout};

#[derive(Args)]
pub struct NudgeArgs {
    #[command(subcommand)]
    command: NudgeCommands,
}

#[derive(Subcommand)]
enum NudgeCommands {
    /// Write a pending-nudge marker for an agent
    Send {
        agent: String,
        #[arg(long)]
        from: String,
        #[arg(long, default_value = "attention")]
        reason: String,
        #[arg(long)]
        subject: String,
        /// Message id the nudge points at
        #[arg(long)]
        message: Option<String>,
        /// Bypass the mail-check debounce window
        #[arg(long)]
        force: bool,
    },
    /// Read and clear the caller's pending nudge
    Check { agent: String },
}

pub fn execute(args: NudgeArgs, layout: &StateLayout, output: OutputFormat) -> Result<()> {
    match args.command {
        NudgeCommands::Send {
            agent,
            from,
            reason,
            subject,
            message,
            force,
        } => {
            let sender = NudgeSender::open(layout, SystemClock)?;
            let mut marker = NudgeMarker::new(from, reason, subject, SystemClock.now_ms());
            if let Some(message) = message {
                marker = marker.with_message_id(message);
            }
            let delivery = sender.deliver(&agent, marker, force)?;
            match output {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "delivered": delivery.delivered,
                    "reason": delivery.reason,
                }))?,
                OutputFormat::Text => {
                    if delivery.delivered {
                        println!("nudged {agent}");
                    } else {
                        println!(
                            "not delivered: {}",
                            delivery.reason.unwrap_or_else(|| "unknown".into())
                        );
                    }
                }
            }
            Ok(())
        }
        NudgeCommands::Check { agent } => {
            let store = NudgeStore::open(layout)?;
            match store.take(&agent)? {
                Some(marker) => match output {
                    OutputFormat::Json => print_json(&marker)?,
                    OutputFormat::Text => {
                        println!("nudge from {}: {} ({})", marker.from, marker.subject, marker.reason);
                        if let Some(id) = &marker.message_id {
                            println!("message: {id}");
                        }
                    }
                },
                None => match output {
                    OutputFormat::Json => print_json(&serde_json::Value::Null)?,
                    OutputFormat::Text => println!("no pending nudge"),
                },
            }
            Ok(())
        }
    }
}
