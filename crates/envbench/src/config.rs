// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Process-wide configuration, read once at startup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_DESCRIPTOR_FILENAME, Error, Result};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Path to the system Blockbench install.
pub const BLOCKBENCH_PATH_VAR: &str = "BLOCKBENCH_PATH";
/// User data folder used by an unisolated Blockbench.
pub const DEFAULT_USER_DATA_VAR: &str = "BLOCKBENCH_DEFAULT_USER_DATA";
/// Root folder holding one directory per environment.
pub const STORAGE_FOLDER_VAR: &str = "ENVBENCH_STORAGE_FOLDER";
/// Descriptor filename inside each environment directory.
pub const ENVIRONMENT_FILE_VAR: &str = "ENVBENCH_ENVIRONMENT_FILE";
/// Folder holding downloaded portable builds.
pub const PORTABLES_CACHE_VAR: &str = "BLOCKBENCH_PORTABLES_CACHE";

/// Name of the cache folder inside the storage root when not overridden.
const PORTABLES_FOLDER: &str = ".portables";

/// Immutable configuration shared by every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// System Blockbench executable (`BLOCKBENCH_PATH`).
    pub executable_path: PathBuf,

    /// User data folder of the system install (`BLOCKBENCH_DEFAULT_USER_DATA`).
    pub default_user_data: PathBuf,

    /// Storage root for environments (`ENVBENCH_STORAGE_FOLDER`).
    pub storage_root: PathBuf,

    /// Descriptor filename (`ENVBENCH_ENVIRONMENT_FILE`).
    pub descriptor_filename: String,

    /// Portable build cache (`BLOCKBENCH_PORTABLES_CACHE`).
    pub cache_root: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Load configuration through an arbitrary variable lookup, falling back
    /// to platform defaults for anything unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let executable_path = match var(BLOCKBENCH_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_executable_path()?,
        };
        let default_user_data = match var(DEFAULT_USER_DATA_VAR) {
            Some(path) => PathBuf::from(path),
            None => config_dir()?.join("Blockbench"),
        };
        let storage_root = match var(STORAGE_FOLDER_VAR) {
            Some(path) => PathBuf::from(path),
            None => config_dir()?.join("EnvBench"),
        };
        let descriptor_filename = var(ENVIRONMENT_FILE_VAR)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_DESCRIPTOR_FILENAME.to_string());
        let cache_root = var(PORTABLES_CACHE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| storage_root.join(PORTABLES_FOLDER));

        Ok(Self {
            executable_path,
            default_user_data,
            storage_root,
            descriptor_filename,
            cache_root,
        })
    }

    /// Self-contained configuration with everything under `root`.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let storage_root = root.join("EnvBench");
        Self {
            executable_path: root.join("Blockbench").join("blockbench"),
            default_user_data: root.join("Blockbench"),
            cache_root: storage_root.join(PORTABLES_FOLDER),
            storage_root,
            descriptor_filename: DEFAULT_DESCRIPTOR_FILENAME.to_string(),
        }
    }
}

fn config_dir() -> Result<PathBuf> {
    dirs::config_dir().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "cannot determine the user configuration directory",
        ))
    })
}

#[cfg(windows)]
fn default_executable_path() -> Result<PathBuf> {
    let local = dirs::data_local_dir().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "cannot determine the local application data directory",
        ))
    })?;
    Ok(local
        .join("Programs")
        .join("Blockbench")
        .join("Blockbench.exe"))
}

#[cfg(target_os = "macos")]
fn default_executable_path() -> Result<PathBuf> {
    Ok(PathBuf::from(
        "/Applications/Blockbench.app/Contents/MacOS/Blockbench",
    ))
}

#[cfg(not(any(windows, target_os = "macos")))]
fn default_executable_path() -> Result<PathBuf> {
    Ok(PathBuf::from("/usr/bin/blockbench"))
}
