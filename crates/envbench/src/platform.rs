// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Host platform detection and portable build naming.

use crate::version::ResolvedVersion;

#[cfg(test)]
#[path = "./platform_test.rs"]
mod platform_test;

/// Where portable builds are downloaded from.
pub const DOWNLOAD_BASE_URL: &str = "https://github.com/JannisX11/blockbench/releases/download";

/// Prefix of every cached build filename.
pub const CACHE_FILE_PREFIX: &str = "blockbench-";

/// Operating systems Blockbench ships portable builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
}

impl HostOs {
    /// Extension of the portable build, and of its cache file.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Windows => "exe",
            Self::MacOs => "dmg",
            Self::Linux => "AppImage",
        }
    }
}

/// Host operating system and architecture, as named in release assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: HostOs,
    pub arch: String,
}

impl Platform {
    pub fn new<S: Into<String>>(os: HostOs, arch: S) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Platform of the running process.
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            _ => HostOs::Linux,
        };
        Self::new(os, release_arch(std::env::consts::ARCH))
    }

    /// URL of the portable build for `version`.
    pub fn download_url(&self, version: &ResolvedVersion) -> String {
        let asset = match self.os {
            HostOs::Windows => format!("Blockbench_{version}_portable.exe"),
            HostOs::MacOs => format!("Blockbench_{}_{version}.dmg", self.arch),
            HostOs::Linux => format!("Blockbench_{}_{version}.AppImage", self.arch),
        };
        format!("{DOWNLOAD_BASE_URL}/{}/{asset}", version.tag())
    }

    /// Cache filename for `version`.
    pub fn cache_file_name(&self, version: &ResolvedVersion) -> String {
        format!("{CACHE_FILE_PREFIX}{version}.{}", self.os.extension())
    }

    /// Recover the version from a cache filename of this platform.
    pub fn version_from_file_name(&self, file_name: &str) -> Option<ResolvedVersion> {
        let version = file_name
            .strip_prefix(CACHE_FILE_PREFIX)?
            .strip_suffix(self.os.extension())?
            .strip_suffix('.')?;
        if version.is_empty() {
            return None;
        }
        Some(ResolvedVersion::new(version))
    }
}

/// Map a Rust target architecture to the release asset naming.
fn release_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        "arm" => "armv7l",
        other => other,
    }
}
