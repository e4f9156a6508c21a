// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Removal of cached builds no environment refers to anymore.

use std::collections::BTreeSet;

use futures::StreamExt;
use itertools::{Either, Itertools};

use crate::{Error, Result};
use crate::cache::ArtifactCache;
use crate::store::{EnvironmentEntry, EnvironmentStore};
use crate::version::{ResolvedVersion, Resolver};

#[cfg(test)]
#[path = "./prune_test.rs"]
mod prune_test;

/// Resolved versions referenced by at least one readable environment.
///
/// Environments whose version cannot be resolved are logged and left out;
/// a single broken descriptor never aborts the scan. Symbolic versions are
/// resolved at call time, so `latest` keeps only today's latest build.
pub async fn compute_live_set(
    store: &EnvironmentStore,
    resolver: &Resolver,
) -> BTreeSet<ResolvedVersion> {
    let referenced: Vec<_> = store
        .list_all()
        .into_iter()
        .filter_map(|(name, entry)| match entry {
            EnvironmentEntry::Ready(descriptor) => Some((name, descriptor.tool_version)),
            _ => None,
        })
        .collect();

    let outcomes: Vec<_> = futures::stream::iter(referenced)
        .then(|(name, version)| async move {
            let resolved = resolver.resolve(&version).await;
            (name, version, resolved)
        })
        .collect()
        .await;

    let (live, failed): (BTreeSet<_>, Vec<_>) = outcomes
        .into_iter()
        .partition_map(|(name, version, resolved)| match resolved {
            Ok(resolved) => Either::Left(resolved),
            Err(err) => Either::Right((name, version, err)),
        });

    for (name, version, err) in failed {
        tracing::warn!(name, %version, error = %err, "skipping environment while pruning");
    }
    live
}

/// Evict every cached build outside the live set and return what was removed.
///
/// Refuses to run offline: `latest` and `beta` cannot be resolved then, and
/// the builds they point at would be evicted while still in use.
pub async fn prune(
    store: &EnvironmentStore,
    resolver: &Resolver,
    cache: &ArtifactCache,
) -> Result<Vec<ResolvedVersion>> {
    if !resolver.connectivity().is_online() {
        return Err(Error::PruneOffline);
    }
    let live = compute_live_set(store, resolver).await;
    let stale: Vec<_> = cache
        .list_installed()
        .into_iter()
        .filter(|version| !live.contains(version))
        .collect();

    for version in &stale {
        cache.evict(version)?;
    }
    tracing::info!(removed = stale.len(), kept = live.len(), "pruned Blockbench cache");
    Ok(stale)
}
