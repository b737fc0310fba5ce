// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Current-run pointer commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use ovs_storage::{CurrentRun, StateLayout};

#[derive(Args)]
pub struct RunArgs {
    #[command(subcommand)]
    command: RunCommands,
}

#[derive(Subcommand)]
enum RunCommands {
    /// Print the active run id
    Show,
    /// Set the active run id
    Set { run_id: String },
    /// Clear the active run pointer
    Clear,
}

pub fn execute(args: RunArgs, layout: &StateLayout) -> Result<()> {
    let current = CurrentRun::open(layout)?;
    match args.command {
        RunCommands::Show => {
            match current.read()? {
                Some(run_id) => println!("{run_id}"),
                None => println!("(no active run)"),
            }
            Ok(())
        }
        RunCommands::Set { run_id } => {
            current.write(&run_id)?;
            Ok(())
        }
        RunCommands::Clear => {
            current.clear()?;
            Ok(())
        }
    }
}
