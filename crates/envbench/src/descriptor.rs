// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Environment descriptor schema and validation.
//!
//! Parsing is kept apart from storage: [`Descriptor::from_json`] takes the
//! raw file contents and either produces a descriptor or reports the exact
//! [`SchemaViolation`], and the store attaches the path.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::version::SymbolicVersion;
use crate::{Error, ISOLATION_FLAG, Result};

#[cfg(test)]
#[path = "./descriptor_test.rs"]
mod descriptor_test;

const NAME_KEY: &str = "name";
const MANAGER_VERSION_KEY: &str = "envbench_version";
const TOOL_VERSION_KEY: &str = "blockbench_version";
const LAUNCH_ARGS_KEY: &str = "launchArgs";

/// Structural problems found in a stored descriptor.
#[derive(Error, Debug)]
pub enum SchemaViolation {
    #[error("not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level")]
    NotAnObject,

    #[error("the environment file is missing a name")]
    MissingName,

    #[error("'envbench_version' must be a string")]
    ManagerVersionNotString,

    #[error("'blockbench_version' must be a string")]
    ToolVersionNotString,

    #[error("'launchArgs' must be an array of strings (or absent)")]
    LaunchArgsNotStrings,
}

/// Persisted description of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Environment name, also the storage directory name.
    pub name: String,

    /// envbench version that last wrote this descriptor.
    #[serde(rename = "envbench_version")]
    pub manager_version: String,

    /// Pinned Blockbench version, symbolic or resolved.
    #[serde(rename = "blockbench_version")]
    pub tool_version: SymbolicVersion,

    /// Extra arguments passed to Blockbench on every launch.
    #[serde(rename = "launchArgs", skip_serializing_if = "Option::is_none")]
    pub launch_args: Option<Vec<String>>,
}

impl Descriptor {
    /// New descriptor written by the running envbench.
    pub fn new<S: Into<String>>(name: S, tool_version: SymbolicVersion) -> Self {
        Self {
            name: name.into(),
            manager_version: crate::ENVBENCH_VERSION.to_string(),
            tool_version,
            launch_args: None,
        }
    }

    /// Builder-style setter for launch arguments.
    pub fn with_launch_args(mut self, args: Vec<String>) -> Self {
        self.launch_args = Some(args);
        self
    }

    /// Parse and validate raw descriptor contents.
    ///
    /// Absent `envbench_version` and `blockbench_version` are filled with the
    /// running envbench version and `latest`. The fill only affects the
    /// returned value, never the stored file.
    pub fn from_json(content: &str) -> std::result::Result<Self, SchemaViolation> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(fields) = value else {
            return Err(SchemaViolation::NotAnObject);
        };

        let name = match fields.get(NAME_KEY) {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(SchemaViolation::MissingName),
        };

        let manager_version = optional_string(
            &fields,
            MANAGER_VERSION_KEY,
            SchemaViolation::ManagerVersionNotString,
        )?
        .unwrap_or_else(|| crate::ENVBENCH_VERSION.to_string());

        let tool_version = optional_string(
            &fields,
            TOOL_VERSION_KEY,
            SchemaViolation::ToolVersionNotString,
        )?
        .map(|version| SymbolicVersion::parse(&version))
        .unwrap_or(SymbolicVersion::Latest);

        let launch_args = match fields.get(LAUNCH_ARGS_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(SchemaViolation::LaunchArgsNotStrings)?,
            ),
            Some(_) => return Err(SchemaViolation::LaunchArgsNotStrings),
        };

        Ok(Self {
            name,
            manager_version,
            tool_version,
            launch_args,
        })
    }

    /// Render as tab-indented JSON, the on-disk format.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Check the invariants that hold for every written descriptor.
    pub fn validate(&self) -> Result<()> {
        if let Some(args) = &self.launch_args {
            validate_launch_args(args.as_slice())?;
        }
        Ok(())
    }
}

/// Reject argument lists that would rebind the user data folder.
pub fn validate_launch_args<S: AsRef<str>>(args: &[S]) -> Result<()> {
    if args.iter().any(|arg| arg.as_ref() == ISOLATION_FLAG) {
        return Err(Error::IsolationFlag);
    }
    Ok(())
}

/// Split a user-supplied argument string on whitespace.
pub fn split_launch_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
    violation: SchemaViolation,
) -> std::result::Result<Option<String>, SchemaViolation> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(violation),
    }
}
