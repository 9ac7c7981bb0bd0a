// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Convergence of the Corefile `ConfigMap` for a `DNS` resource.
//!
//! Each call fetches the current `ConfigMap`, renders the desired one, and
//! issues a create or an update only when the stored data differs:
//!
//! ```text
//! Start -> Fetched(absent)  -> Created -> Refetched -> Done
//!       -> Fetched(present) -> equal                -> Done
//!       -> Fetched(present) -> Updated -> Refetched -> Done
//! ```
//!
//! Failures are terminal for the call and are never retried here; the
//! controller requeues the whole reconciliation.

use crate::crd::DNS;
use crate::dns_errors::{ConfigMapError, EnsureConfigMapError};
use crate::dns_resources::{build_dns_configmap, dns_configmap_key};
use crate::store::{ConfigMapStore, ResourceKey};
use k8s_openapi::api::core::v1::ConfigMap;
use similar::TextDiff;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lines of context shown around each change in the update diff
const DIFF_CONTEXT_LINES: usize = 3;

/// Result of a successful `ConfigMap` convergence.
#[derive(Clone, Debug)]
pub struct ConfigMapOutcome {
    /// `true` if the `ConfigMap` was created or updated
    pub changed: bool,
    /// `true` if the `ConfigMap` did not exist and was created
    pub created: bool,
    /// The `ConfigMap` as stored after the reconciliation
    pub config_map: ConfigMap,
}

/// Ensures the Corefile `ConfigMap` for `dns` exists and matches its spec.
///
/// # Arguments
///
/// * `store` - Store the `ConfigMap` is read from and written to
/// * `dns` - The `DNS` resource owning the `ConfigMap`
/// * `cluster_domain` - Cluster domain served by the kubernetes plugin; empty means `cluster.local`
/// * `namespace` - Operand namespace the `ConfigMap` lives in
///
/// # Returns
///
/// The stored `ConfigMap` and whether it was changed. After a create or an
/// update the `ConfigMap` is fetched again so the returned object reflects
/// any mutation the store applied on write.
///
/// # Errors
///
/// Returns an error if fetching fails for a reason other than not-found, if
/// the Corefile cannot be rendered (nothing is written then), or if the create
/// or update fails, including optimistic-concurrency conflicts. The error
/// carries whether a `ConfigMap` existed and the last fetched object.
pub async fn ensure_dns_configmap<S>(
    store: &S,
    dns: &DNS,
    cluster_domain: &str,
    namespace: &str,
) -> Result<ConfigMapOutcome, EnsureConfigMapError>
where
    S: ConfigMapStore + ?Sized,
{
    let key = dns_configmap_key(dns, namespace);

    let current = store
        .get(&key)
        .await
        .map_err(|e| EnsureConfigMapError::new(ConfigMapError::Get(e), None))?;

    let desired = match build_dns_configmap(dns, cluster_domain, namespace) {
        Ok(desired) => desired,
        Err(e) => return Err(EnsureConfigMapError::new(ConfigMapError::Build(e), current)),
    };

    let Some(current) = current else {
        debug!(namespace = %key.namespace, name = %key.name, "ConfigMap not found, creating");
        store
            .create(&desired)
            .await
            .map_err(|e| EnsureConfigMapError::new(ConfigMapError::Create(e), None))?;
        info!("Created configmap {key}");

        let config_map = refetch(store, &key, None).await?;
        return Ok(ConfigMapOutcome {
            changed: true,
            created: true,
            config_map,
        });
    };

    let Some(updated) = configmap_changed(&current, &desired) else {
        debug!(namespace = %key.namespace, name = %key.name, "ConfigMap is up to date");
        return Ok(ConfigMapOutcome {
            changed: false,
            created: false,
            config_map: current,
        });
    };

    // Diff before updating because the store may mutate the object.
    let diff = configmap_diff(&current, &updated);
    if let Err(e) = store.update(&updated).await {
        return Err(EnsureConfigMapError::new(
            ConfigMapError::Update(e),
            Some(current),
        ));
    }
    info!("Updated configmap {key}:\n{diff}");

    let config_map = refetch(store, &key, Some(current)).await?;
    Ok(ConfigMapOutcome {
        changed: true,
        created: false,
        config_map,
    })
}

async fn refetch<S>(
    store: &S,
    key: &ResourceKey,
    previous: Option<ConfigMap>,
) -> Result<ConfigMap, EnsureConfigMapError>
where
    S: ConfigMapStore + ?Sized,
{
    match store.get(key).await {
        Ok(Some(config_map)) => Ok(config_map),
        Ok(None) => Err(EnsureConfigMapError::new(
            ConfigMapError::MissingAfterWrite(key.to_string()),
            previous,
        )),
        Err(e) => Err(EnsureConfigMapError::new(ConfigMapError::Get(e), previous)),
    }
}

/// Compares the stored data with the desired data.
///
/// Returns `None` when they are equal, treating absent and empty data alike.
/// Otherwise returns a copy of `current` with only its data replaced, keeping
/// the `resourceVersion` the store uses to detect conflicting writes.
#[must_use]
pub fn configmap_changed(current: &ConfigMap, desired: &ConfigMap) -> Option<ConfigMap> {
    if data_equal(current.data.as_ref(), desired.data.as_ref()) {
        return None;
    }
    let mut updated = current.clone();
    updated.data.clone_from(&desired.data);
    Some(updated)
}

fn data_equal(
    current: Option<&BTreeMap<String, String>>,
    desired: Option<&BTreeMap<String, String>>,
) -> bool {
    let empty = BTreeMap::new();
    current.unwrap_or(&empty) == desired.unwrap_or(&empty)
}

/// Renders a unified diff of two `ConfigMap`s serialized as YAML.
#[must_use]
pub fn configmap_diff(current: &ConfigMap, updated: &ConfigMap) -> String {
    let old = to_yaml(current);
    let new = to_yaml(updated);
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(DIFF_CONTEXT_LINES)
        .header("current", "updated")
        .to_string()
}

fn to_yaml(config_map: &ConfigMap) -> String {
    serde_yaml::to_string(config_map).unwrap_or_else(|e| format!("<unserializable: {e}>\n"))
}

#[cfg(test)]
#[path = "dns_configmap_tests.rs"]
mod dns_configmap_tests;
