// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session commands: the spawn path's narrow interface to the store.

use crate::output::{print_json, OutputFormat};
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use ovs_core::{format_age_ms, AgentSession, Capability, Clock, IdGen, SystemClock, UuidIdGen};
use ovs_storage::{SessionStore, StateLayout};
use std::path::PathBuf;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommands,
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List sessions
    List {
        /// Only sessions tagged with this run id
        #[arg(long)]
        run: Option<String>,
        /// Only non-terminal sessions
        #[arg(long)]
        active: bool,
    },
    /// Show one session
    Show { name: String },
    /// Insert or replace a session record (used by the spawn path)
    Upsert {
        #[arg(long)]
        name: String,
        #[arg(long)]
        capability: Capability,
        #[arg(long)]
        worktree: Option<PathBuf>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        bead: Option<String>,
        #[arg(long)]
        tmux: Option<String>,
        #[arg(long)]
        pid: Option<u32>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value_t = 0)]
        depth: u32,
        #[arg(long)]
        run: Option<String>,
    },
    /// Record activity from an agent (refreshes liveness, recovers
    /// booting/stalled sessions)
    Touch { name: String },
}

pub fn execute(args: SessionArgs, layout: &StateLayout, output: OutputFormat) -> Result<()> {
    let store = SessionStore::open(layout)?;
    let now = SystemClock.now_ms();
    match args.command {
        SessionCommands::List { run, active } => {
            let mut sessions = match run {
                Some(run_id) => store.get_by_run(&run_id)?,
                None => store.get_all()?,
            };
            if active {
                sessions.retain(|s| s.state.is_active());
            }
            match output {
                OutputFormat::Json => print_json(&sessions)?,
                OutputFormat::Text => {
                    for s in &sessions {
                        println!(
                            "{:<24} {:<12} {:<10} last activity {} ago",
                            s.agent_name,
                            s.capability,
                            s.state,
                            format_age_ms(s.activity_age_ms(now))
                        );
                    }
                }
            }
            Ok(())
        }
        SessionCommands::Show { name } => {
            let session = store
                .get_by_name(&name)?
                .ok_or_else(|| anyhow!("no such agent: {name}"))?;
            match output {
                OutputFormat::Json => print_json(&session)?,
                OutputFormat::Text => {
                    println!("agent:      {}", session.agent_name);
                    println!("capability: {}", session.capability);
                    println!("state:      {}", session.state);
                    println!("worktree:   {}", session.worktree_path.display());
                    println!("branch:     {}", session.branch_name);
                    if session.has_bead() {
                        println!("bead:       {}", session.bead_id);
                    }
                    println!("tmux:       {}", session.tmux_session);
                    if let Some(run) = &session.run_id {
                        println!("run:        {run}");
                    }
                    if let Some(parent) = &session.parent_agent {
                        println!("parent:     {parent} (depth {})", session.depth);
                    }
                    println!(
                        "activity:   {} ago (escalation level {})",
                        format_age_ms(session.activity_age_ms(now)),
                        session.escalation_level
                    );
                }
            }
            Ok(())
        }
        SessionCommands::Upsert {
            name,
            capability,
            worktree,
            branch,
            bead,
            tmux,
            pid,
            parent,
            depth,
            run,
        } => {
            if parent.is_none() && depth != 0 {
                return Err(anyhow!("depth must be 0 for a session without --parent"));
            }
            let mut session = match store.get_by_name(&name)? {
                Some(existing) => existing,
                None => AgentSession::new(UuidIdGen.next(), name.as_str(), capability, now),
            };
            session.capability = capability;
            if let Some(worktree) = worktree {
                session.worktree_path = worktree;
            }
            if let Some(branch) = branch {
                session.branch_name = branch;
            }
            if let Some(bead) = bead {
                session.bead_id = bead;
            }
            if let Some(tmux) = tmux {
                session.tmux_session = tmux;
            }
            if pid.is_some() {
                session.pid = pid;
            }
            session.parent_agent = parent;
            session.depth = depth;
            if run.is_some() {
                session.run_id = run;
            }
            store.upsert(&session)?;
            println!("{}", session.agent_name);
            Ok(())
        }
        SessionCommands::Touch { name } => {
            store.record_activity(&name, now)?;
            Ok(())
        }
    }
}
