// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! HTTP access and connectivity detection.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{Error, Result};

/// Endpoint probed at startup to decide whether the network is usable.
pub const CONNECTIVITY_PROBE_URL: &str = "https://api.github.com";

/// Network reachability, determined once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl Connectivity {
    /// Only a successful probe counts as online.
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read-only HTTP access used by the registry client and the artifact cache.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request and buffer the whole body.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`Transport`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("envbench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Network {
                url: String::new(),
                source,
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!(url, "GET");
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };
        let response = self.http.get(url).send().await.map_err(network)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(network)?;
        Ok(HttpResponse { status, body })
    }
}

/// Decide connectivity by reaching the registry host at all.
///
/// Any response, whatever its status, proves the network is up.
pub async fn probe_connectivity(transport: &dyn Transport) -> Connectivity {
    match transport.get(CONNECTIVITY_PROBE_URL).await {
        Ok(_) => Connectivity::Online,
        Err(err) => {
            tracing::debug!(error = %err, "connectivity probe failed");
            Connectivity::Offline
        }
    }
}
