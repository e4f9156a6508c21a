// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Orchestration of the store, resolver and cache behind single operations.
//!
//! [`EnvBench`] is the context the command line builds once at startup. Each
//! method maps to one user facing action and fails with a typed [`Error`]
//! that the caller reports before exiting.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ArtifactCache;
use crate::descriptor::{Descriptor, validate_launch_args};
use crate::platform::Platform;
use crate::registry::ReleaseRegistry;
use crate::store::{EnvironmentEntry, EnvironmentState, EnvironmentStore, validate_name};
use crate::transport::{Connectivity, HttpTransport, Transport, probe_connectivity};
use crate::version::{ResolvedVersion, Resolver, SymbolicVersion};
use crate::{Config, ENVBENCH_VERSION, Error, Result};

#[cfg(test)]
#[path = "./manager_test.rs"]
mod manager_test;

/// Prefix of the hidden environments used by [`EnvBench::quicklaunch`].
pub const QUICKLAUNCH_PREFIX: &str = ".quicklaunch-";

/// Parameters of [`EnvBench::create_environment`].
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub name: String,
    pub version: SymbolicVersion,
    pub launch_args: Vec<String>,
    /// Replace an existing environment of the same name.
    pub force: bool,
}

/// Changes applied by [`EnvBench::modify_environment`].
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct Modification {
    pub version: Option<SymbolicVersion>,
    pub launch_args: Option<Vec<String>>,
    pub rename: Option<String>,
}

impl Modification {
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.launch_args.is_none() && self.rename.is_none()
    }
}

/// Name of the hidden environment kept for a quicklaunched version.
///
/// The symbolic version is used so that `latest` keeps one environment
/// across releases.
pub fn quicklaunch_name(version: &SymbolicVersion) -> String {
    format!("{QUICKLAUNCH_PREFIX}{version}")
}

pub struct EnvBench {
    config: Config,
    store: EnvironmentStore,
    resolver: Resolver,
    cache: ArtifactCache,
}

impl EnvBench {
    pub fn new(config: Config, transport: Arc<dyn Transport>, connectivity: Connectivity) -> Self {
        Self::with_platform(config, transport, connectivity, Platform::current())
    }

    pub fn with_platform(
        config: Config,
        transport: Arc<dyn Transport>,
        connectivity: Connectivity,
        platform: Platform,
    ) -> Self {
        let store = EnvironmentStore::from_config(&config);
        let resolver = Resolver::new(ReleaseRegistry::new(transport.clone()), connectivity);
        let cache = ArtifactCache::new(&config.cache_root, platform, transport, connectivity);
        Self {
            config,
            store,
            resolver,
            cache,
        }
    }

    /// Build the context over HTTP, probing connectivity once.
    pub async fn connect(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
        let connectivity = probe_connectivity(transport.as_ref()).await;
        tracing::debug!(?connectivity, "probed connectivity");
        let bench = Self::new(config, transport, connectivity);
        bench.store.ensure_root()?;
        Ok(bench)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &EnvironmentStore {
        &self.store
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn connectivity(&self) -> Connectivity {
        self.resolver.connectivity()
    }

    /// Resolve and validate `version`, then make sure its build is cached.
    pub async fn prepare_version(
        &self,
        version: &SymbolicVersion,
    ) -> Result<(ResolvedVersion, PathBuf)> {
        let resolved = self.resolver.resolve(version).await?;
        if !self.resolver.validate(&resolved).await? {
            return Err(Error::InvalidVersion(resolved.to_string()));
        }
        let path = self.cache.ensure_installed(&resolved).await?;
        Ok((resolved, path))
    }

    /// Create a new environment.
    ///
    /// When forced, an existing environment is only deleted once its
    /// replacement version has been prepared.
    pub async fn create_environment(&self, request: &CreateRequest) -> Result<Descriptor> {
        validate_name(&request.name)?;
        validate_launch_args(request.launch_args.as_slice())?;

        let existing = self.store.exists(&request.name);
        if existing != EnvironmentState::Absent && !request.force {
            return Err(Error::AlreadyExists(request.name.clone()));
        }

        self.prepare_version(&request.version).await?;

        if existing != EnvironmentState::Absent {
            tracing::info!(name = %request.name, "replacing existing environment");
            self.store.remove(&request.name)?;
        }
        let descriptor = Descriptor::new(&request.name, request.version.clone())
            .with_launch_args(request.launch_args.clone());
        self.store.create(&request.name, &descriptor, false)?;
        Ok(descriptor)
    }

    /// Launch `name` with its stored arguments followed by `extra_args`.
    pub async fn launch_environment(&self, name: &str, extra_args: &[String]) -> Result<()> {
        let descriptor = self.store.read(name)?;
        let args: Vec<String> = descriptor
            .launch_args
            .iter()
            .flatten()
            .chain(extra_args)
            .cloned()
            .collect();
        validate_launch_args(args.as_slice())?;

        let resolved = self.resolver.resolve(&descriptor.tool_version).await?;
        let executable = self.select_executable(&resolved).await?;
        let data_dir = self.store.environment_dir(name);
        crate::launch(&executable, &data_dir, args.as_slice()).await
    }

    /// Pick the system install for the current latest release, and the
    /// cached build for anything else.
    async fn select_executable(&self, resolved: &ResolvedVersion) -> Result<PathBuf> {
        if self.connectivity().is_online() && self.config.executable_path.is_file() {
            match self.resolver.resolve(&SymbolicVersion::Latest).await {
                Ok(latest) if latest == *resolved => {
                    tracing::debug!(path = ?self.config.executable_path, "using system Blockbench");
                    return Ok(self.config.executable_path.clone());
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "could not resolve latest, using cached build");
                }
            }
        }
        self.cache.ensure_installed(resolved).await
    }

    /// Apply `changes` to `name`, renaming last.
    pub async fn modify_environment(
        &self,
        name: &str,
        changes: &Modification,
    ) -> Result<Descriptor> {
        let mut descriptor = self.store.read(name)?;
        if let Some(new_name) = &changes.rename {
            validate_name(new_name)?;
            if self.store.exists(new_name) != EnvironmentState::Absent {
                return Err(Error::AlreadyExists(new_name.clone()));
            }
        }

        if let Some(args) = &changes.launch_args {
            validate_launch_args(args.as_slice())?;
            descriptor.launch_args = Some(args.clone());
        }
        if let Some(version) = &changes.version {
            let resolved = self.resolver.resolve(version).await?;
            if !self.resolver.validate(&resolved).await? {
                return Err(Error::InvalidVersion(resolved.to_string()));
            }
            descriptor.tool_version = version.clone();
        }
        descriptor.manager_version = ENVBENCH_VERSION.to_string();
        self.store.write(name, &descriptor, false)?;

        if let Some(new_name) = &changes.rename {
            self.store.rename(name, new_name)?;
            descriptor.name = new_name.clone();
        }
        Ok(descriptor)
    }

    pub fn rename_environment(&self, old: &str, new: &str) -> Result<()> {
        self.store.rename(old, new)
    }

    pub fn remove_environment(&self, name: &str) -> Result<()> {
        self.store.remove(name)
    }

    pub fn environment(&self, name: &str) -> Result<Descriptor> {
        self.store.read(name)
    }

    pub fn environments(&self) -> BTreeMap<String, EnvironmentEntry> {
        self.store.list_all()
    }

    /// Launch `version` in its hidden environment, creating it on first use.
    pub async fn quicklaunch(
        &self,
        version: &SymbolicVersion,
        reset: bool,
        extra_args: &[String],
    ) -> Result<()> {
        validate_launch_args(extra_args)?;
        self.prepare_version(version).await?;

        let name = quicklaunch_name(version);
        let state = self.store.exists(&name);
        if reset && state != EnvironmentState::Absent {
            tracing::info!(%version, "resetting quicklaunch environment");
            self.store.remove(&name)?;
        }
        if reset || state != EnvironmentState::Complete {
            let descriptor = Descriptor::new(&name, version.clone());
            self.store.create_unchecked(&name, &descriptor, true)?;
        }
        self.launch_environment(&name, extra_args).await
    }

    /// Versions present in the cache.
    pub fn installed_versions(&self) -> BTreeSet<ResolvedVersion> {
        self.cache.list_installed()
    }

    /// Versions currently referenced by an environment.
    pub async fn live_versions(&self) -> BTreeSet<ResolvedVersion> {
        crate::compute_live_set(&self.store, &self.resolver).await
    }

    /// Evict unreferenced builds, returning the evicted versions.
    pub async fn prune(&self) -> Result<Vec<ResolvedVersion>> {
        crate::prune(&self.store, &self.resolver, &self.cache).await
    }
}
