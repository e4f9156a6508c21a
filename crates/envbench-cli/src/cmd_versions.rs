// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench blockbench_versions` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// List the locally installed versions of Blockbench
#[derive(Debug, Args)]
pub struct CmdVersions {
    /// Uninstall versions no environment uses anymore
    #[clap(short, long)]
    pub prune: bool,
}

impl CmdVersions {
    pub async fn run(&mut self) -> Result<i32> {
        let bench = crate::connect().await?;

        if self.prune {
            let spinner = crate::ui::spinner("Pruning Blockbench versions");
            let pruned = bench.prune().await;
            spinner.finish_and_clear();
            let removed = pruned?;
            if removed.is_empty() {
                println!("{}", "Nothing to prune.".green());
            }
            for version in removed {
                println!("{} {}", "Removed".red(), version.to_string().cyan());
            }
        }

        let installed = bench.installed_versions();
        if installed.is_empty() {
            println!("{}", "No Blockbench versions installed.".yellow());
            return Ok(0);
        }

        let live = bench.live_versions().await;
        let platform = bench.cache().platform();
        println!("{}", "Installed Blockbench versions:".green());
        for version in installed {
            let marker = if live.contains(&version) {
                "".normal()
            } else {
                " unused".dimmed()
            };
            println!(
                "{} {}{}",
                version.to_string().cyan(),
                format!("({})", platform.cache_file_name(&version)).green(),
                marker
            );
        }
        Ok(0)
    }
}
