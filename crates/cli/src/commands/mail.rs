// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail commands: the inter-agent message bus surface.

use crate::output::{print_json, OutputFormat};
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use ovs_core::{format_age_ms, Clock, MailMessage, MailPriority, MailType, SystemClock};
use ovs_engine::{mail_wait, MailBroker, MailWaitOptions, MailWaitStatus, SendRequest};
use ovs_storage::{MailFilter, MailStore, PurgeOptions, SessionStore, StateLayout};
use std::path::PathBuf;

#[derive(Args)]
pub struct MailArgs {
    #[command(subcommand)]
    command: MailCommands,
}

#[derive(Subcommand)]
enum MailCommands {
    /// Send a message (group addresses @all, @workers, @<capability> fan out)
    Send {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        /// Message type
        #[arg(long = "type", default_value = "status")]
        kind: MailType,
        #[arg(long, default_value = "normal")]
        priority: MailPriority,
        /// JSON payload for protocol messages
        #[arg(long)]
        payload: Option<String>,
        #[arg(long)]
        thread: Option<String>,
        /// Write the recipient's nudge marker even past the debounce window
        #[arg(long)]
        force: bool,
    },
    /// Fetch unread mail for an agent, marking it read
    Check { agent: String },
    /// List messages without touching read state
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Either endpoint of the conversation
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one message
    Show { id: String },
    /// Mark one message read
    Read { id: String },
    /// Reply to a message (recipient, subject, and thread derived)
    Reply {
        id: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        force: bool,
    },
    /// Delete messages
    Purge {
        #[arg(long)]
        all: bool,
        #[arg(long = "older-than-ms")]
        older_than_ms: Option<u64>,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Long-poll for mail (coordinators and leads also wake on nudges)
    Wait {
        #[arg(long)]
        agent: String,
        #[arg(long = "timeout-ms", default_value_t = 300_000)]
        timeout_ms: u64,
        #[arg(long = "initial-poll-ms", default_value_t = 1_000)]
        initial_poll_ms: u64,
        #[arg(long = "max-poll-ms", default_value_t = 10_000)]
        max_poll_ms: u64,
        #[arg(long, default_value_t = 1.5)]
        backoff: f64,
        /// Creating this file cancels the wait at the next poll
        #[arg(long = "cancel-file")]
        cancel_file: Option<PathBuf>,
    },
}

pub async fn execute(args: MailArgs, layout: &StateLayout, output: OutputFormat) -> Result<()> {
    let broker = MailBroker::open(layout, SystemClock)?;
    match args.command {
        MailCommands::Send {
            from,
            to,
            subject,
            body,
            kind,
            priority,
            payload,
            thread,
            force,
        } => {
            let mut request = SendRequest::new(from, to, subject, body, kind, priority);
            if let Some(raw) = payload {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| anyhow!("invalid --payload JSON: {e}"))?;
                request = request.with_payload(value);
            }
            if let Some(thread) = thread {
                request = request.with_thread_id(thread);
            }
            let ids = broker.send(&request, force)?;
            match output {
                OutputFormat::Json => print_json(&ids)?,
                OutputFormat::Text => {
                    for id in &ids {
                        println!("{id}");
                    }
                    if ids.is_empty() {
                        eprintln!("no recipients resolved");
                    }
                }
            }
            Ok(())
        }
        MailCommands::Check { agent } => {
            let messages = broker.check(&agent)?;
            render_messages(&messages, output)
        }
        MailCommands::List {
            from,
            to,
            agent,
            unread,
            limit,
        } => {
            let store = MailStore::open(layout)?;
            let messages = store.list(&MailFilter {
                from,
                to,
                agent,
                unread_only: unread,
                limit,
            })?;
            render_messages(&messages, output)
        }
        MailCommands::Show { id } => {
            let store = MailStore::open(layout)?;
            let message = store
                .get(&id)?
                .ok_or_else(|| anyhow!("no such message: {id}"))?;
            match output {
                OutputFormat::Json => print_json(&message)?,
                OutputFormat::Text => {
                    println!("id:       {}", message.id);
                    println!("from:     {}", message.from);
                    println!("to:       {}", message.to);
                    println!("type:     {}", message.kind);
                    println!("priority: {}", message.priority);
                    println!("subject:  {}", message.subject);
                    if let Some(thread) = &message.thread_id {
                        println!("thread:   {thread}");
                    }
                    println!();
                    println!("{}", message.body);
                }
            }
            Ok(())
        }
        MailCommands::Read { id } => {
            let store = MailStore::open(layout)?;
            let already = store.mark_read(&id)?;
            if already {
                println!("{id} was already read");
            } else {
                println!("{id} marked read");
            }
            Ok(())
        }
        MailCommands::Reply {
            id,
            from,
            body,
            force,
        } => {
            let reply_id = broker.reply(&id, &body, &from, force)?;
            println!("{reply_id}");
            Ok(())
        }
        MailCommands::Purge {
            all,
            older_than_ms,
            agent,
        } => {
            if !all && older_than_ms.is_none() && agent.is_none() {
                return Err(anyhow!(
                    "refusing to purge nothing: pass --all, --older-than-ms, or --agent"
                ));
            }
            let store = MailStore::open(layout)?;
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64;
            let removed = store.purge(
                &PurgeOptions {
                    all,
                    older_than_ms,
                    agent,
                },
                now,
            )?;
            println!("purged {removed} message(s)");
            Ok(())
        }
        MailCommands::Wait {
            agent,
            timeout_ms,
            initial_poll_ms,
            max_poll_ms,
            backoff,
            cancel_file,
        } => {
            let capability = SessionStore::open(layout)?
                .get_by_name(&agent)?
                .map(|s| s.capability);
            let mut opts = match capability {
                Some(capability) => MailWaitOptions::for_capability(agent.as_str(), capability),
                None => MailWaitOptions::new(agent.as_str()),
            };
            opts.timeout_ms = timeout_ms;
            opts.initial_poll_ms = initial_poll_ms;
            opts.max_poll_ms = max_poll_ms;
            opts.backoff = backoff;
            opts.cancel_file = cancel_file;

            let outcome = mail_wait(&broker, &opts).await?;
            match output {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "status": status_str(outcome.status),
                    "messages": outcome.messages,
                    "nudge": outcome.nudge,
                }))?,
                OutputFormat::Text => {
                    println!("status: {}", status_str(outcome.status));
                    if let Some(nudge) = &outcome.nudge {
                        println!("nudge from {}: {}", nudge.from, nudge.subject);
                    }
                    render_messages(&outcome.messages, output)?;
                }
            }
            Ok(())
        }
    }
}

fn status_str(status: MailWaitStatus) -> &'static str {
    match status {
        MailWaitStatus::Message => "message",
        MailWaitStatus::Nudged => "nudged",
        MailWaitStatus::Timeout => "timeout",
        MailWaitStatus::Cancelled => "cancelled",
    }
}

fn render_messages(messages: &[MailMessage], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&messages),
        OutputFormat::Text => {
            let now = SystemClock.now_ms();
            for m in messages {
                println!(
                    "{}  {:>8}  {} -> {}  [{}/{}]  {}",
                    m.id,
                    format_age_ms(now.saturating_sub(m.created_at)),
                    m.from,
                    m.to,
                    m.kind,
                    m.priority,
                    m.subject
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
