// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench list` command.

use clap::Args;
use colored::Colorize;
use envbench::EnvironmentEntry;
use miette::Result;

/// List all available environments
#[derive(Debug, Args)]
pub struct CmdList {
    /// Show details about each environment
    #[clap(short, long)]
    pub long: bool,
}

impl CmdList {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        let environments = bench.environments();

        if environments.is_empty() {
            println!("{}", "No environments found!".red());
            println!(
                "{}",
                "Create a new environment with `envbench create <name>`.".yellow()
            );
            return Ok(0);
        }

        println!("{}", "Available Environments:".green());
        let last = environments.len() - 1;
        for (index, (name, entry)) in environments.iter().enumerate() {
            let branch = if index == last { "└ " } else { "├ " };
            match entry {
                EnvironmentEntry::Ready(descriptor) => {
                    println!("{}{}", branch.dimmed(), name.green());
                    if self.long {
                        let stem = if index == last { "  " } else { "│ " };
                        println!(
                            "{}{}{}",
                            stem.dimmed(),
                            "├ Blockbench Version: ".dimmed(),
                            descriptor.tool_version.to_string().cyan()
                        );
                        if let Some(args) = &descriptor.launch_args {
                            println!(
                                "{}{}{}",
                                stem.dimmed(),
                                "├ Launch Args: ".dimmed(),
                                args.join(" ").cyan()
                            );
                        }
                        println!(
                            "{}{}{}",
                            stem.dimmed(),
                            "└ EnvBench Version: ".dimmed(),
                            descriptor.manager_version.cyan()
                        );
                    }
                }
                EnvironmentEntry::FolderOnly => {
                    println!(
                        "{}{}",
                        branch.dimmed(),
                        format!("{name} (Missing environment file!)").yellow()
                    );
                }
                EnvironmentEntry::Absent => {
                    println!(
                        "{}{}",
                        branch.dimmed(),
                        format!("{name} (Missing environment folder!)").yellow()
                    );
                }
                EnvironmentEntry::Malformed(reason) => {
                    println!(
                        "{}{}",
                        branch.dimmed(),
                        format!("{name} (Invalid environment file: {reason})").red()
                    );
                }
            }
        }
        Ok(0)
    }
}
