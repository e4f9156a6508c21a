// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench info` command.

use clap::Args;
use colored::Colorize;
use envbench::EnvBench;
use miette::Result;

/// Display information about an environment
#[derive(Debug, Args)]
pub struct CmdInfo {
    /// Name of the environment
    pub name: String,
}

impl CmdInfo {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench).await
    }

    pub async fn execute(&self, bench: &EnvBench) -> Result<i32> {
        let descriptor = bench.environment(&self.name)?;
        let resolved = match bench.resolver().resolve(&descriptor.tool_version).await {
            Ok(resolved) => resolved.to_string(),
            Err(err) => {
                tracing::debug!(error = %err, "could not resolve version for display");
                "unresolved".to_string()
            }
        };
        let args = descriptor
            .launch_args
            .as_ref()
            .filter(|args| !args.is_empty())
            .map_or_else(|| "none".to_string(), |args| args.join(" "));

        println!(
            "{} {}{}",
            "Information about environment".green(),
            self.name.cyan(),
            ":".green()
        );
        println!("{}{}{}", "├ ".dimmed(), "Name: ".green(), descriptor.name.cyan());
        println!(
            "{}{}{} ({})",
            "├ ".dimmed(),
            "Blockbench version: ".green(),
            descriptor.tool_version.to_string().cyan(),
            resolved
        );
        println!("{}{}{}", "├ ".dimmed(), "Launch arguments: ".green(), args.cyan());
        println!(
            "{}{}{}",
            "├ ".dimmed(),
            "Data folder: ".green(),
            bench.store().environment_dir(&self.name).display()
        );
        println!(
            "{}{}{}",
            "└ ".dimmed(),
            "EnvBench version: ".green(),
            descriptor.manager_version.cyan()
        );
        Ok(0)
    }
}
