// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench modify` command.

use clap::Args;
use colored::Colorize;
use envbench::{EnvBench, Modification, SymbolicVersion};
use miette::Result;

/// Change the version, launch arguments or name of an environment
#[derive(Debug, Args)]
pub struct CmdModify {
    /// Name of the environment to modify
    pub name: String,

    /// Modify without asking for confirmation
    #[clap(short, long)]
    pub force: bool,

    /// Rename the environment afterwards
    #[clap(short, long, value_name = "NEW_NAME")]
    pub rename: Option<String>,

    /// Pin a different Blockbench version
    #[clap(short = 'v', long)]
    pub version: Option<String>,

    /// Replace the stored launch arguments
    #[clap(short = 'a', long, allow_hyphen_values = true)]
    pub launch_args: Option<String>,
}

impl CmdModify {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        self.execute(&bench).await
    }

    fn modification(&self) -> Modification {
        Modification {
            version: self.version.as_deref().map(SymbolicVersion::parse),
            launch_args: self
                .launch_args
                .as_deref()
                .map(envbench::descriptor::split_launch_args),
            rename: self.rename.clone(),
        }
    }

    pub async fn execute(&self, bench: &EnvBench) -> Result<i32> {
        let changes = self.modification();
        if changes.is_empty() {
            println!("{}", "Nothing to modify.".yellow());
            return Ok(0);
        }
        // Fail before prompting when the environment is missing.
        bench.environment(&self.name)?;

        if !self.force {
            println!(
                "{} {} {}",
                "Modify environment".yellow(),
                self.name.cyan(),
                "with the following changes?".yellow()
            );
            if let Some(version) = &self.version {
                println!("{} {}", "- Blockbench version:".yellow(), version.cyan());
            }
            if let Some(args) = &self.launch_args {
                println!("{} {}", "- Launch arguments:".yellow(), args.cyan());
            }
            if let Some(new_name) = &self.rename {
                println!("{} {}", "- Rename to".yellow(), new_name.cyan());
            }
            if !crate::ui::confirm("Confirm?")? {
                return Ok(crate::ui::cancelled());
            }
        }

        let modified = bench.modify_environment(&self.name, &changes).await?;
        println!(
            "{} {} {}",
            "Environment".green(),
            modified.name.cyan(),
            "modified successfully!".green()
        );
        Ok(0)
    }
}
