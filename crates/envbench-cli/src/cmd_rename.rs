// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench rename` command.

use clap::Args;
use colored::Colorize;
use envbench::EnvBench;
use miette::Result;

/// Rename an environment
#[derive(Debug, Args)]
pub struct CmdRename {
    /// Current name of the environment
    pub name: String,

    /// New name for the environment
    pub new_name: String,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub confirm: bool,
}

impl CmdRename {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench)
    }

    pub fn execute(&self, bench: &EnvBench) -> Result<i32> {
        envbench::validate_name(&self.new_name)?;
        if !self.confirm {
            let prompt = format!(
                "Rename environment {} to {}?",
                self.name.cyan(),
                self.new_name.cyan()
            );
            if !crate::ui::confirm(prompt)? {
                return Ok(crate::ui::cancelled());
            }
        }

        bench.rename_environment(&self.name, &self.new_name)?;
        println!(
            "{} {} {} {}",
            "Renamed".green(),
            self.name.cyan(),
            "to".green(),
            self.new_name.cyan()
        );
        Ok(0)
    }
}
