// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! envbench - Isolated Blockbench Environment Manager
//!
//! This crate provides the core library for managing isolated Blockbench
//! environments. Each environment pins a Blockbench build and owns a private
//! user data folder, so several builds can run side by side without touching
//! each other's settings, plugins or recent projects.
//!
//! # Overview
//!
//! Environments live as directories under a storage root, each holding a
//! descriptor file (`.envbench.json` by default):
//!
//! ```json
//! {
//! 	"name": "plugin-dev",
//! 	"envbench_version": "0.3.0",
//! 	"blockbench_version": "latest",
//! 	"launchArgs": ["--no-sandbox"]
//! }
//! ```
//!
//! Symbolic versions (`latest`, `beta`, `4.12.0`, `v4.12.0`) are resolved
//! against the Blockbench release registry, and each resolved build is
//! downloaded once into a portable cache that is pruned when no environment
//! references it anymore.

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod launcher;
pub mod manager;
pub mod platform;
pub mod prune;
pub mod registry;
pub mod store;
pub mod transport;
pub mod version;

#[cfg(test)]
mod testing;

pub use cache::ArtifactCache;
pub use config::Config;
pub use descriptor::{Descriptor, SchemaViolation};
pub use error::{Error, Result};
pub use launcher::launch;
pub use manager::{CreateRequest, EnvBench, Modification};
pub use platform::{HostOs, Platform};
pub use prune::{compute_live_set, prune};
pub use registry::{Release, ReleaseRegistry};
pub use store::{EnvironmentEntry, EnvironmentState, EnvironmentStore, validate_name};
pub use transport::{Connectivity, HttpResponse, HttpTransport, Transport, probe_connectivity};
pub use version::{ResolvedVersion, Resolver, SymbolicVersion};

/// Version of envbench recorded in the descriptors it writes.
pub const ENVBENCH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known filename for environment descriptors.
pub const DEFAULT_DESCRIPTOR_FILENAME: &str = ".envbench.json";

/// Blockbench flag that binds the user data folder of an instance.
pub const ISOLATION_FLAG: &str = "--userData";

/// Name prefix reserved for hidden environments (quicklaunch, caches).
pub const RESERVED_PREFIX: char = '.';
