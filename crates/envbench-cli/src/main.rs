// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! envbench - Isolated Blockbench Environment Manager CLI

use clap::{Parser, Subcommand};
use envbench::EnvBench;
use miette::Result;

mod cmd_create;
mod cmd_delete;
mod cmd_info;
mod cmd_launch;
mod cmd_list;
mod cmd_menu;
mod cmd_modify;
mod cmd_quicklaunch;
mod cmd_rename;
mod cmd_version;
mod cmd_versions;
mod ui;


use cmd_create::CmdCreate;
use cmd_delete::CmdDelete;
use cmd_info::CmdInfo;
use cmd_launch::CmdLaunch;
use cmd_list::CmdList;
use cmd_menu::CmdMenu;
use cmd_modify::CmdModify;
use cmd_quicklaunch::CmdQuicklaunch;
use cmd_rename::CmdRename;
use cmd_version::CmdVersion;
use cmd_versions::CmdVersions;

#[derive(Parser)]
#[clap(
    name = "envbench",
    about = "Isolated Blockbench Environment Manager",
    version,
    long_about = "Run several Blockbench builds side by side, each with its own settings, plugins and recent projects"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new environment
    Create(CmdCreate),

    /// Launch an existing environment
    #[clap(alias = "start")]
    Launch(CmdLaunch),

    /// Delete an environment and all of its data
    #[clap(alias = "remove")]
    Delete(CmdDelete),

    /// Rename an environment
    Rename(CmdRename),

    /// Change the version, launch arguments or name of an environment
    Modify(CmdModify),

    /// List all available environments
    List(CmdList),

    /// Display information about an environment
    Info(CmdInfo),

    /// Pick an environment and an action interactively
    Menu(CmdMenu),

    /// List the locally installed versions of Blockbench
    #[clap(name = "blockbench_versions")]
    BlockbenchVersions(CmdVersions),

    /// Launch a throwaway environment for a Blockbench version
    Quicklaunch(CmdQuicklaunch),

    /// Print the version of EnvBench
    Version(CmdVersion),
}

impl Opt {
    async fn run(self) -> Result<i32> {
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        match self.cmd {
            Command::Create(mut cmd) => cmd.run().await,
            Command::Launch(mut cmd) => cmd.run().await,
            Command::Delete(mut cmd) => cmd.run().await,
            Command::Rename(mut cmd) => cmd.run().await,
            Command::Modify(mut cmd) => cmd.run().await,
            Command::List(mut cmd) => cmd.run().await,
            Command::Info(mut cmd) => cmd.run().await,
            Command::Menu(mut cmd) => cmd.run().await,
            Command::BlockbenchVersions(mut cmd) => cmd.run().await,
            Command::Quicklaunch(mut cmd) => cmd.run().await,
            Command::Version(mut cmd) => cmd.run().await,
        }
    }
}

/// Load configuration from the environment and open the manager.
pub async fn connect() -> Result<EnvBench> {
    let config = envbench::Config::from_env()?;
    let bench = EnvBench::connect(config).await?;
    if !bench.connectivity().is_online() {
        tracing::warn!("no internet connection, only cached Blockbench builds are available");
    }
    Ok(bench)
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run().await?;
    std::process::exit(code);
}
