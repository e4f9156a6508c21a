// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench quicklaunch` command.

use clap::Args;
use colored::Colorize;
use envbench::SymbolicVersion;
use miette::Result;

/// Launch a throwaway environment for a Blockbench version
#[derive(Debug, Args)]
pub struct CmdQuicklaunch {
    /// Blockbench version to launch: latest, beta or an explicit version
    pub version: String,

    /// Erase the data kept for this version before launching
    #[clap(short, long)]
    pub reset: bool,

    /// Additional arguments passed to Blockbench
    #[clap(short = 'a', long, allow_hyphen_values = true)]
    pub launch_args: Option<String>,
}

impl CmdQuicklaunch {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;
        let version = SymbolicVersion::parse(&self.version);
        let extra = crate::ui::launch_args(self.launch_args.as_deref());

        if self.reset {
            println!(
                "{} {}{}",
                "Resetting environment for Blockbench".yellow(),
                self.version.cyan(),
                "...".yellow()
            );
        }
        println!(
            "{} {}{}",
            "Launching Blockbench".green(),
            self.version.cyan(),
            "...".green()
        );
        bench.quicklaunch(&version, self.reset, &extra).await?;
        Ok(0)
    }
}
