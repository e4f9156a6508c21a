// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench delete` command.

use clap::Args;
use colored::Colorize;
use envbench::{EnvBench, EnvironmentState};
use miette::Result;

/// Delete an environment and all of its data
#[derive(Debug, Args)]
pub struct CmdDelete {
    /// Name of the environment to delete
    pub name: String,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub confirm: bool,
}

impl CmdDelete {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench)
    }

    pub fn execute(&self, bench: &EnvBench) -> Result<i32> {
        if bench.store().exists(&self.name) == EnvironmentState::Absent {
            return Err(envbench::Error::NotFound(self.name.clone()).into());
        }
        if !self.confirm {
            let prompt = format!(
                "Delete environment {}? Its settings, plugins and recent projects are lost",
                self.name.cyan()
            );
            if !crate::ui::confirm(prompt)? {
                return Ok(crate::ui::cancelled());
            }
        }

        bench.remove_environment(&self.name)?;
        println!(
            "{} {} {}",
            "Environment".green(),
            self.name.cyan(),
            "deleted.".green()
        );
        Ok(0)
    }
}
