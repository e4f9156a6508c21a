// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Cache of downloaded portable Blockbench builds.
//!
//! Each resolved version maps to exactly one file,
//! `<cache root>/blockbench-<version>.<ext>`. A build is downloaded the first
//! time it is needed and only removed by [`crate::prune`].

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::platform::Platform;
use crate::transport::{Connectivity, Transport};
use crate::version::ResolvedVersion;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./cache_test.rs"]
mod cache_test;

/// Portable build cache rooted at one directory.
#[derive(Clone)]
pub struct ArtifactCache {
    root: PathBuf,
    platform: Platform,
    transport: Arc<dyn Transport>,
    connectivity: Connectivity,
}

impl ArtifactCache {
    pub fn new<P: Into<PathBuf>>(
        root: P,
        platform: Platform,
        transport: Arc<dyn Transport>,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            root: root.into(),
            platform,
            transport,
            connectivity,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Deterministic location of the build for `version`.
    pub fn path_for(&self, version: &ResolvedVersion) -> PathBuf {
        self.root.join(self.platform.cache_file_name(version))
    }

    pub fn is_installed(&self, version: &ResolvedVersion) -> bool {
        self.path_for(version).is_file()
    }

    /// Return the cached build for `version`, downloading it on a miss.
    pub async fn ensure_installed(&self, version: &ResolvedVersion) -> Result<PathBuf> {
        let target = self.path_for(version);
        if target.is_file() {
            tracing::debug!(%version, path = ?target, "Blockbench already cached");
            return Ok(target);
        }

        if !self.connectivity.is_online() {
            return Err(Error::Offline(version.to_string()));
        }

        let url = self.platform.download_url(version);
        tracing::info!(%version, %url, "downloading Blockbench");
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(Error::Download {
                url,
                status: response.status,
            });
        }

        std::fs::create_dir_all(&self.root).map_err(|error| Error::WriteFailed {
            path: self.root.clone(),
            error,
        })?;
        let write_failed = |error: std::io::Error| Error::WriteFailed {
            path: target.clone(),
            error,
        };
        // Stage next to the target so the final rename never crosses devices.
        let mut staged = tempfile::NamedTempFile::new_in(&self.root).map_err(write_failed)?;
        staged.write_all(&response.body).map_err(write_failed)?;
        staged.flush().map_err(write_failed)?;
        mark_executable(staged.path()).map_err(write_failed)?;
        staged
            .persist(&target)
            .map_err(|err| write_failed(err.error))?;

        tracing::info!(%version, path = ?target, "Blockbench downloaded");
        Ok(target)
    }

    /// Versions currently present in the cache.
    ///
    /// A cache folder that cannot be read yields an empty set; it simply has
    /// not been created yet.
    pub fn list_installed(&self) -> BTreeSet<ResolvedVersion> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(root = ?self.root, error = %err, "cache folder not readable");
                return BTreeSet::new();
            }
        };
        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                self.platform.version_from_file_name(name.to_str()?)
            })
            .collect()
    }

    /// Delete the cached build for `version`.
    pub fn evict(&self, version: &ResolvedVersion) -> Result<()> {
        let path = self.path_for(version);
        if !path.is_file() {
            return Err(Error::ArtifactNotFound {
                version: version.to_string(),
                path,
            });
        }
        std::fs::remove_file(&path).map_err(|error| Error::WriteFailed {
            path: path.clone(),
            error,
        })?;
        tracing::info!(%version, ?path, "removed cached Blockbench");
        Ok(())
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
