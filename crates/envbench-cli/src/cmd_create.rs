// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench create` command.

use clap::Args;
use colored::Colorize;
use envbench::{CreateRequest, EnvBench, EnvironmentState, SymbolicVersion};
use miette::Result;

/// Create a new environment
#[derive(Debug, Args)]
pub struct CmdCreate {
    /// Name of the new environment
    pub name: String,

    /// Blockbench version to use: latest, beta or an explicit version
    #[clap(short = 'v', long, default_value = "latest")]
    pub version: String,

    /// Arguments passed to Blockbench whenever the environment launches
    #[clap(short = 'a', long, allow_hyphen_values = true)]
    pub launch_args: Option<String>,

    /// Replace the environment if it already exists
    #[clap(short, long)]
    pub force: bool,

    /// Skip confirmation prompts
    #[clap(long)]
    pub confirm: bool,
}

impl CmdCreate {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench).await
    }

    pub async fn execute(&self, bench: &EnvBench) -> Result<i32> {
        envbench::validate_name(&self.name)?;
        let exists = bench.store().exists(&self.name) != EnvironmentState::Absent;
        if exists && !self.force {
            return Err(envbench::Error::AlreadyExists(self.name.clone()).into());
        }

        if !self.confirm {
            let prompt = if exists {
                format!(
                    "An environment named {} already exists. Delete it and create a new one?",
                    self.name.cyan()
                )
            } else {
                format!("Create a new environment named {}?", self.name.cyan())
            };
            if !crate::ui::confirm(prompt)? {
                return Ok(crate::ui::cancelled());
            }
        }

        let request = CreateRequest {
            name: self.name.clone(),
            version: SymbolicVersion::parse(&self.version),
            launch_args: crate::ui::launch_args(self.launch_args.as_deref()),
            force: self.force,
        };
        let spinner = crate::ui::spinner(format!("Preparing Blockbench {}", self.version));
        let created = bench.create_environment(&request).await;
        spinner.finish_and_clear();
        created?;

        println!(
            "{} {} {}",
            "Environment".green(),
            self.name.cyan(),
            "created successfully!".green()
        );
        Ok(0)
    }
}
