// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Spawning Blockbench bound to an isolated user data folder.

use std::path::Path;

use tokio::process::Command;

use crate::descriptor::validate_launch_args;
use crate::{Error, ISOLATION_FLAG, Result};

#[cfg(test)]
#[path = "./launcher_test.rs"]
mod launcher_test;

/// Run `executable` with its user data bound to `data_dir` and wait for it.
///
/// The isolation flag always comes first, followed by `extra_args` in order.
/// There is no timeout.
pub async fn launch<S: AsRef<str>>(
    executable: &Path,
    data_dir: &Path,
    extra_args: &[S],
) -> Result<()> {
    validate_launch_args(extra_args)?;

    tracing::info!(?executable, ?data_dir, "launching Blockbench");
    let status = Command::new(executable)
        .arg(ISOLATION_FLAG)
        .arg(data_dir)
        .args(extra_args.iter().map(AsRef::as_ref))
        .status()
        .await
        .map_err(|error| Error::Spawn {
            path: executable.to_path_buf(),
            error,
        })?;

    if status.success() {
        tracing::debug!(?executable, "Blockbench exited cleanly");
        Ok(())
    } else {
        Err(Error::Launch {
            code: status.code(),
        })
    }
}
