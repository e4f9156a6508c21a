// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envbench version` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Print the version of EnvBench
#[derive(Debug, Args)]
pub struct CmdVersion {
    /// Also print the folders EnvBench reads and writes
    #[clap(long)]
    pub paths: bool,
}

impl CmdVersion {
    pub async fn run(&mut self) -> Result<i32> {
        println!("{}", format!("v{}", envbench::ENVBENCH_VERSION).green());
        if !self.paths {
            return Ok(0);
        }

        let config = envbench::Config::from_env()?;
        let rows = [
            ("Blockbench", &config.executable_path),
            ("Default user data", &config.default_user_data),
            ("Environments", &config.storage_root),
            ("Portable cache", &config.cache_root),
        ];
        for (label, path) in rows {
            println!("{} {}", format!("{label}:").green(), path.display());
        }
        println!(
            "{} {}",
            "Environment file:".green(),
            config.descriptor_filename.cyan()
        );
        Ok(0)
    }
}
