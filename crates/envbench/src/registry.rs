// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Blockbench release registry client.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::transport::{HttpResponse, Transport};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./registry_test.rs"]
mod registry_test;

/// GitHub releases API for Blockbench.
pub const RELEASES_API_URL: &str = "https://api.github.com/repos/JannisX11/Blockbench/releases";

/// One published release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Git tag, the version prefixed with `v`.
    pub tag_name: String,

    #[serde(default)]
    pub prerelease: bool,
}

/// Read-only queries against the release registry.
#[derive(Clone)]
pub struct ReleaseRegistry {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ReleaseRegistry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, RELEASES_API_URL)
    }

    pub fn with_base_url<S: Into<String>>(transport: Arc<dyn Transport>, base_url: S) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn latest_url(&self) -> String {
        format!("{}/latest", self.base_url)
    }

    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}/tags/{tag}", self.base_url)
    }

    /// All releases, newest first.
    pub async fn releases(&self) -> Result<Vec<Release>> {
        let url = self.base_url.clone();
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(Error::Registry {
                url,
                status: response.status,
            });
        }
        decode(&url, &response)
    }

    /// The newest stable release, if any has been published.
    pub async fn latest_release(&self) -> Result<Option<Release>> {
        let url = self.latest_url();
        let response = self.transport.get(&url).await?;
        match response.status {
            404 => Ok(None),
            _ if response.is_success() => decode(&url, &response).map(Some),
            status => Err(Error::Registry { url, status }),
        }
    }

    /// The release carrying exactly `tag`.
    ///
    /// Any non-success status is treated as "no such release".
    pub async fn release_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        let url = self.tag_url(tag);
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            tracing::debug!(tag, status = response.status, "release tag not found");
            return Ok(None);
        }
        decode(&url, &response).map(Some)
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|error| Error::InvalidResponse {
        url: url.to_string(),
        error,
    })
}
