// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench launch` command.

use clap::Args;
use colored::Colorize;
use envbench::EnvBench;
use miette::Result;

/// Launch an existing environment
#[derive(Debug, Args)]
pub struct CmdLaunch {
    /// Name of the environment to launch
    pub name: String,

    /// Additional arguments for this launch only
    #[clap(short = 'a', long, allow_hyphen_values = true)]
    pub launch_args: Option<String>,
}

impl CmdLaunch {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench).await
    }

    pub async fn execute(&self, bench: &EnvBench) -> Result<i32> {
        let extra = crate::ui::launch_args(self.launch_args.as_deref());
        println!(
            "{} {}{}",
            "Launching environment".green(),
            self.name.cyan(),
            "...".green()
        );
        bench.launch_environment(&self.name, &extra).await?;
        Ok(0)
    }
}
