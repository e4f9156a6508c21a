// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::registry::{RELEASES_API_URL, ReleaseRegistry};
use crate::transport::{Connectivity, HttpResponse, Transport};
use crate::version::{ResolvedVersion, Resolver};
use crate::{ArtifactCache, Error, Platform, Result};

/// Serves canned responses per URL and records every request.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, (u16, Bytes)>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond<B: Into<Bytes>>(&self, url: &str, status: u16, body: B) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.into()));
    }

    pub fn respond_json(&self, url: &str, json: serde_json::Value) {
        self.respond(url, 200, json.to_string());
    }

    /// Register `/latest` and the release list for a set of `(tag, prerelease)`.
    pub fn publish(&self, releases: &[(&str, bool)]) {
        let list: Vec<_> = releases
            .iter()
            .map(|(tag, pre)| serde_json::json!({ "tag_name": tag, "prerelease": pre }))
            .collect();
        self.respond_json(RELEASES_API_URL, serde_json::Value::Array(list));
        if let Some((tag, _)) = releases.iter().find(|(_, pre)| !pre) {
            self.respond_json(
                &format!("{RELEASES_API_URL}/latest"),
                serde_json::json!({ "tag_name": tag, "prerelease": false }),
            );
        }
        for (tag, pre) in releases {
            self.respond_json(
                &format!("{RELEASES_API_URL}/tags/{tag}"),
                serde_json::json!({ "tag_name": tag, "prerelease": pre }),
            );
        }
    }

    /// Serve a small artifact body for `version` on `platform`.
    pub fn serve_artifact(&self, platform: &Platform, version: &str) {
        let url = platform.download_url(&ResolvedVersion::new(version));
        self.respond(&url, 200, format!("blockbench {version}"));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or((404, Bytes::from_static(b"{\"message\":\"Not Found\"}")));
        Ok(HttpResponse { status, body })
    }
}

/// Transport that behaves like an unplugged cable.
pub struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            format!("unreachable: {url}"),
        )))
    }
}

pub fn resolver(transport: Arc<MockTransport>, connectivity: Connectivity) -> Resolver {
    Resolver::new(ReleaseRegistry::new(transport), connectivity)
}

pub fn cache(
    root: &std::path::Path,
    transport: Arc<MockTransport>,
    connectivity: Connectivity,
) -> ArtifactCache {
    ArtifactCache::new(root, Platform::new(crate::HostOs::Linux, "x64"), transport, connectivity)
}
