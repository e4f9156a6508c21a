// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench menu` command.

use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cmd_delete::CmdDelete;
use crate::cmd_info::CmdInfo;
use crate::cmd_launch::CmdLaunch;
use crate::cmd_rename::CmdRename;

const ACTIONS: [&str; 4] = ["launch", "info", "rename", "delete"];

/// Pick an environment and an action interactively
#[derive(Debug, Args)]
pub struct CmdMenu {}

impl CmdMenu {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        let names: Vec<String> = bench.environments().into_keys().collect();
        if names.is_empty() {
            println!("{}", "No environments found!".red());
            println!(
                "{}",
                "Create a new environment with `envbench create <name>`.".yellow()
            );
            return Ok(1);
        }

        let Some(selected) = Select::new()
            .with_prompt("Select an environment")
            .items(names.as_slice())
            .default(0)
            .interact_opt()
            .into_diagnostic()?
        else {
            return Ok(crate::ui::cancelled());
        };
        let name = names[selected].clone();

        let Some(action) = Select::new()
            .with_prompt(format!("Select an action for {}", name.cyan()))
            .items(&ACTIONS[..])
            .default(0)
            .interact_opt()
            .into_diagnostic()?
        else {
            return Ok(crate::ui::cancelled());
        };

        match ACTIONS[action] {
            "launch" => {
                CmdLaunch {
                    name,
                    launch_args: None,
                }
                .execute(&bench)
                .await
            }
            "info" => CmdInfo { name }.execute(&bench).await,
            "rename" => {
                let new_name: String = Input::new()
                    .with_prompt(format!("Enter a new name for {}", name.cyan()))
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                if new_name.trim().is_empty() {
                    return Ok(crate::ui::cancelled());
                }
                CmdRename {
                    name,
                    new_name: new_name.trim().to_string(),
                    confirm: true,
                }
                .execute(&bench)
            }
            _ => {
                CmdDelete {
                    name,
                    confirm: false,
                }
                .execute(&bench)
            }
        }
    }
}
