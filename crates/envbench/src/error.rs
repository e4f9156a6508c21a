// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for envbench operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::descriptor::SchemaViolation;

/// Convenience Result type with envbench Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during envbench operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Referenced environment does not exist
    #[error("Environment {0:?} does not exist")]
    #[diagnostic(
        code(envbench::not_found),
        help("Run 'envbench list' to see the available environments")
    )]
    NotFound(String),

    /// Referenced cached artifact does not exist
    #[error("Blockbench {version} is not installed (expected {path:?})")]
    #[diagnostic(code(envbench::artifact_not_found))]
    ArtifactNotFound { version: String, path: PathBuf },

    /// Name collision on create or rename
    #[error("Environment {0:?} already exists")]
    #[diagnostic(
        code(envbench::already_exists),
        help("Pick another name, or pass --force to replace the existing environment")
    )]
    AlreadyExists(String),

    /// Environment name that cannot be used as a storage directory
    #[error("Invalid environment name {name:?}: {reason}")]
    #[diagnostic(code(envbench::invalid_name))]
    InvalidName { name: String, reason: &'static str },

    /// Launch arguments would override the isolated data folder
    #[error("Launch arguments cannot contain {}", crate::ISOLATION_FLAG)]
    #[diagnostic(
        code(envbench::isolation_flag),
        help("envbench binds the user data folder itself; passing the flag would break the isolation of the environment")
    )]
    IsolationFlag,

    /// Stored descriptor is structurally invalid
    #[error("Malformed environment file {path:?}")]
    #[diagnostic(
        code(envbench::malformed_descriptor),
        help("Fix the file by hand, or delete and recreate the environment")
    )]
    MalformedDescriptor {
        path: PathBuf,
        #[source]
        violation: SchemaViolation,
    },

    /// Symbolic version cannot be resolved
    #[error("Cannot resolve Blockbench version {version:?}: {reason}")]
    #[diagnostic(code(envbench::resolution_failed))]
    Resolution { version: String, reason: String },

    /// Resolved version failed validation
    #[error("Invalid Blockbench version {0:?}")]
    #[diagnostic(
        code(envbench::invalid_version),
        help("Versions older than {} cannot change their user data folder", crate::version::MINIMUM_VERSION)
    )]
    InvalidVersion(String),

    /// Network required but unavailable
    #[error("You are offline, so Blockbench {0} cannot be downloaded")]
    #[diagnostic(code(envbench::offline))]
    Offline(String),

    /// Pruning needs every symbolic version resolved
    #[error("You are offline, so the Blockbench versions in use cannot be determined")]
    #[diagnostic(
        code(envbench::prune_offline),
        help("Connect to the internet and prune again")
    )]
    PruneOffline,

    /// Artifact download returned a non-success status
    #[error("Failed to download {url}: HTTP {status}")]
    #[diagnostic(
        code(envbench::download_failed),
        help("The requested version may not ship a portable executable for this platform")
    )]
    Download { url: String, status: u16 },

    /// Registry lookup returned a non-success status
    #[error("Release registry returned HTTP {status} for {url}")]
    #[diagnostic(code(envbench::registry_failed))]
    Registry { url: String, status: u16 },

    /// Transport-level failure
    #[error("Request to {url} failed")]
    #[diagnostic(code(envbench::network_failed))]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Registry payload could not be decoded
    #[error("Unexpected response from {url}")]
    #[diagnostic(code(envbench::invalid_response))]
    InvalidResponse {
        url: String,
        #[source]
        error: serde_json::Error,
    },

    /// Executable could not be started
    #[error("Failed to launch {path:?}")]
    #[diagnostic(code(envbench::spawn_failed))]
    Spawn {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Executable exited with a non-zero status
    #[error("Blockbench exited with {}", describe_exit(.code))]
    #[diagnostic(code(envbench::launch_failed))]
    Launch { code: Option<i32> },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(envbench::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file or directory
    #[error("Failed to write: {path:?}")]
    #[diagnostic(code(envbench::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(envbench::io_error))]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by a signal)".to_string(),
    }
}
