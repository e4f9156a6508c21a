// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Symbolic and resolved Blockbench versions, and the resolver between them.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::registry::ReleaseRegistry;
use crate::transport::Connectivity;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./version_test.rs"]
mod version_test;

/// Oldest Blockbench that accepts a custom user data folder.
pub const MINIMUM_VERSION: &str = "4.10.0";

const MINIMUM_SEMVER: semver::Version = semver::Version::new(4, 10, 0);

const LATEST: &str = "latest";
const BETA: &str = "beta";

/// A user-facing version reference that still needs resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolicVersion {
    /// Newest stable release.
    Latest,
    /// Newest prerelease.
    Beta,
    /// Literal version as typed, optionally `v`-prefixed.
    Explicit(String),
}

impl SymbolicVersion {
    /// Interpret a version string. Never fails; unknown strings are explicit.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            LATEST => Self::Latest,
            BETA => Self::Beta,
            other => Self::Explicit(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => LATEST,
            Self::Beta => BETA,
            Self::Explicit(version) => version,
        }
    }
}

impl Default for SymbolicVersion {
    fn default() -> Self {
        Self::Latest
    }
}

impl FromStr for SymbolicVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SymbolicVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SymbolicVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A concrete version string such as `4.12.0`, without the `v` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Wrap a concrete version, dropping one leading `v`.
    pub fn new<S: AsRef<str>>(version: S) -> Self {
        let version = version.as_ref().trim();
        Self(version.strip_prefix('v').unwrap_or(version).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry tag for this version (`v` + version).
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }

    /// Semantic version, if the string is one.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.0).ok()
    }

    /// Whether this version predates [`MINIMUM_VERSION`].
    ///
    /// Strings that are not semantic versions count as unsupported.
    pub fn is_below_minimum(&self) -> bool {
        match self.semver() {
            Some(version) => version < MINIMUM_SEMVER,
            None => true,
        }
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ResolvedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.semver(), other.semver()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ResolvedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Turns symbolic versions into registry-validated ones.
///
/// Nothing is memoized: resolving `latest` twice asks the registry twice, so
/// a release published in between changes the answer.
#[derive(Clone)]
pub struct Resolver {
    registry: ReleaseRegistry,
    connectivity: Connectivity,
}

impl Resolver {
    pub fn new(registry: ReleaseRegistry, connectivity: Connectivity) -> Self {
        Self {
            registry,
            connectivity,
        }
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Resolve a symbolic version to a concrete one.
    pub async fn resolve(&self, version: &SymbolicVersion) -> Result<ResolvedVersion> {
        let tag = match version {
            SymbolicVersion::Latest => self
                .registry
                .latest_release()
                .await?
                .map(|release| release.tag_name)
                .ok_or_else(|| Error::Resolution {
                    version: version.to_string(),
                    reason: "no release has been published".to_string(),
                })?,
            SymbolicVersion::Beta => self
                .registry
                .releases()
                .await?
                .into_iter()
                .find(|release| release.prerelease)
                .map(|release| release.tag_name)
                .ok_or_else(|| Error::Resolution {
                    version: version.to_string(),
                    reason: "no beta release found".to_string(),
                })?,
            SymbolicVersion::Explicit(literal) => literal.clone(),
        };

        let resolved = ResolvedVersion::new(&tag);
        if resolved.as_str().is_empty() {
            return Err(Error::Resolution {
                version: version.to_string(),
                reason: "no version specified".to_string(),
            });
        }
        tracing::debug!(%version, %resolved, "resolved Blockbench version");
        Ok(resolved)
    }

    /// Check that a resolved version is supported and published.
    ///
    /// Without confirmed connectivity every version is accepted, so that
    /// environments stay usable offline.
    pub async fn validate(&self, version: &ResolvedVersion) -> Result<bool> {
        if !self.connectivity.is_online() {
            tracing::warn!(
                %version,
                "offline, so the Blockbench version of this environment cannot be validated"
            );
            return Ok(true);
        }

        if version.is_below_minimum() {
            tracing::warn!(
                %version,
                minimum = MINIMUM_VERSION,
                "Blockbench version does not support changing the user data folder"
            );
            return Ok(false);
        }

        let tag = version.tag();
        let found = self.registry.release_by_tag(&tag).await?;
        Ok(found.is_some_and(|release| release.tag_name == tag))
    }
}
