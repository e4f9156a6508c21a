// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Environment storage: one directory per environment under the storage root,
//! each holding a descriptor file.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::descriptor::Descriptor;
use crate::{Config, Error, RESERVED_PREFIX, Result};

#[cfg(test)]
#[path = "./store_test.rs"]
mod store_test;

/// On-disk state of a single environment name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentState {
    /// No directory for the environment.
    Absent,
    /// Directory exists but holds no descriptor. Reported, never repaired.
    FolderOnly,
    /// Directory and descriptor both exist.
    Complete,
}

/// Classified entry produced by [`EnvironmentStore::list_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentEntry {
    Ready(Descriptor),
    FolderOnly,
    Absent,
    /// Descriptor exists but could not be read or parsed.
    Malformed(String),
}

/// Check that `name` can be used as an environment directory.
pub fn validate_name(name: &str) -> Result<()> {
    validate_component(name)?;
    if name.starts_with(RESERVED_PREFIX) {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "names cannot start with a period",
        });
    }
    Ok(())
}

/// Check that `name` addresses one directory directly under the storage root.
///
/// Hidden names are allowed here; only user-chosen names go through
/// [`validate_name`].
fn validate_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let reason = if name.is_empty() {
        "names cannot be empty"
    } else if name.contains(['/', '\\']) {
        "names cannot contain path separators"
    } else if !single {
        "names must refer to a folder inside the storage folder"
    } else {
        return Ok(());
    };
    Err(Error::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Exclusive owner of environment directories and descriptors.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    root: PathBuf,
    descriptor_filename: String,
}

impl EnvironmentStore {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, descriptor_filename: S) -> Self {
        Self {
            root: root.into(),
            descriptor_filename: descriptor_filename.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage_root, &config.descriptor_filename)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|error| Error::WriteFailed {
            path: self.root.clone(),
            error,
        })
    }

    /// Directory of `name`, which doubles as its isolated user data folder.
    pub fn environment_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.environment_dir(name).join(&self.descriptor_filename)
    }

    /// Names that do not address a folder inside the root are always absent.
    pub fn exists(&self, name: &str) -> EnvironmentState {
        if validate_component(name).is_err() || !self.environment_dir(name).is_dir() {
            EnvironmentState::Absent
        } else if !self.descriptor_path(name).is_file() {
            EnvironmentState::FolderOnly
        } else {
            EnvironmentState::Complete
        }
    }

    /// Create a new environment directory and its descriptor.
    ///
    /// Fails if anything already exists under `name` unless `force` is set;
    /// confirming and clearing an existing environment is up to the caller.
    pub fn create(&self, name: &str, descriptor: &Descriptor, force: bool) -> Result<()> {
        validate_name(name)?;
        self.create_unchecked(name, descriptor, force)
    }

    /// [`Self::create`] without name validation, for hidden environments.
    pub(crate) fn create_unchecked(
        &self,
        name: &str,
        descriptor: &Descriptor,
        force: bool,
    ) -> Result<()> {
        validate_component(name)?;
        if !force && self.exists(name) != EnvironmentState::Absent {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        descriptor.validate()?;

        let dir = self.environment_dir(name);
        std::fs::create_dir_all(&dir).map_err(|error| Error::WriteFailed {
            path: dir.clone(),
            error,
        })?;
        self.persist(name, descriptor)?;
        tracing::info!(name, "created environment");
        Ok(())
    }

    /// Read and validate the descriptor of `name`.
    pub fn read(&self, name: &str) -> Result<Descriptor> {
        validate_component(name)?;
        if self.exists(name) != EnvironmentState::Complete {
            return Err(Error::NotFound(name.to_string()));
        }
        let path = self.descriptor_path(name);
        let content = std::fs::read_to_string(&path).map_err(|error| Error::ReadFailed {
            path: path.clone(),
            error,
        })?;
        Descriptor::from_json(&content)
            .map_err(|violation| Error::MalformedDescriptor { path, violation })
    }

    /// Replace the descriptor of `name` wholesale.
    ///
    /// Unless `force` is set the environment must already exist.
    pub fn write(&self, name: &str, descriptor: &Descriptor, force: bool) -> Result<()> {
        validate_component(name)?;
        if !force && self.exists(name) == EnvironmentState::Absent {
            return Err(Error::NotFound(name.to_string()));
        }
        descriptor.validate()?;
        if force {
            let dir = self.environment_dir(name);
            std::fs::create_dir_all(&dir).map_err(|error| Error::WriteFailed {
                path: dir.clone(),
                error,
            })?;
        }
        self.persist(name, descriptor)
    }

    /// Move `old` to `new` and record the new name in its descriptor.
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        validate_component(old)?;
        validate_name(new)?;
        let old_state = self.exists(old);
        if old_state == EnvironmentState::Absent {
            return Err(Error::NotFound(old.to_string()));
        }
        if self.exists(new) != EnvironmentState::Absent {
            return Err(Error::AlreadyExists(new.to_string()));
        }

        let from = self.environment_dir(old);
        let to = self.environment_dir(new);
        std::fs::rename(&from, &to).map_err(|error| Error::WriteFailed {
            path: to.clone(),
            error,
        })?;

        if old_state == EnvironmentState::Complete {
            let mut descriptor = self.read(new)?;
            descriptor.name = new.to_string();
            self.write(new, &descriptor, false)?;
        }
        tracing::info!(old, new, "renamed environment");
        Ok(())
    }

    /// Delete `name` and everything inside its directory.
    pub fn remove(&self, name: &str) -> Result<()> {
        validate_component(name)?;
        if self.exists(name) == EnvironmentState::Absent {
            return Err(Error::NotFound(name.to_string()));
        }
        let dir = self.environment_dir(name);
        std::fs::remove_dir_all(&dir).map_err(|error| Error::WriteFailed {
            path: dir.clone(),
            error,
        })?;
        tracing::info!(name, "removed environment");
        Ok(())
    }

    /// Every visible environment, keyed by name.
    ///
    /// Entries starting with the reserved prefix are hidden. A storage root
    /// that cannot be read lists as empty.
    pub fn list_all(&self) -> BTreeMap<String, EnvironmentEntry> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(root = ?self.root, error = %err, "storage root not readable");
                return BTreeMap::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with(RESERVED_PREFIX))
            .map(|name| {
                let entry = self.classify(&name);
                (name, entry)
            })
            .collect()
    }

    fn classify(&self, name: &str) -> EnvironmentEntry {
        match self.exists(name) {
            EnvironmentState::Absent => EnvironmentEntry::Absent,
            EnvironmentState::FolderOnly => EnvironmentEntry::FolderOnly,
            EnvironmentState::Complete => match self.read(name) {
                Ok(descriptor) => EnvironmentEntry::Ready(descriptor),
                Err(Error::MalformedDescriptor { violation, .. }) => {
                    tracing::warn!(name, error = %violation, "malformed environment file");
                    EnvironmentEntry::Malformed(violation.to_string())
                }
                Err(err) => {
                    tracing::warn!(name, error = %err, "unreadable environment file");
                    EnvironmentEntry::Malformed(err.to_string())
                }
            },
        }
    }

    fn persist(&self, name: &str, descriptor: &Descriptor) -> Result<()> {
        let path = self.descriptor_path(name);
        let json = descriptor.to_json().map_err(|error| Error::WriteFailed {
            path: path.clone(),
            error: error.into(),
        })?;
        std::fs::write(&path, json).map_err(|error| Error::WriteFailed { path, error })
    }
}
