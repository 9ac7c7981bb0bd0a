// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Key-value access to `ConfigMap`s.
//!
//! The convergence engine only needs three operations on the store: get by
//! key, create, and update. [`ConfigMapStore`] captures them so the engine is
//! independent of the transport; [`KubeConfigMapStore`] implements them on the
//! Kubernetes API.
//!
//! Updates carry the `resourceVersion` of the object they were derived from,
//! so a write based on stale state fails with [`StoreError::Conflict`] instead
//! of overwriting a concurrent change.

use crate::dns_errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::PostParams;
use kube::{Api, Client, ResourceExt};
use std::fmt;
use tracing::debug;

/// HTTP status the API server returns for conflicts and already-existing objects
const HTTP_CONFLICT: u16 = 409;

/// Namespace and name of a namespaced resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the key of a `ConfigMap`, if it has a name.
    ///
    /// A missing namespace maps to the empty string.
    #[must_use]
    pub fn of(config_map: &ConfigMap) -> Option<Self> {
        let name = config_map.metadata.name.clone()?;
        Some(Self::new(config_map.namespace().unwrap_or_default(), name))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Get / create / update access to `ConfigMap`s.
#[async_trait]
pub trait ConfigMapStore: Send + Sync {
    /// Fetches a `ConfigMap`. Not-found is `Ok(None)`, not an error.
    async fn get(&self, key: &ResourceKey) -> Result<Option<ConfigMap>, StoreError>;

    /// Creates a `ConfigMap`. Fails with [`StoreError::Conflict`] if it already exists.
    async fn create(&self, config_map: &ConfigMap) -> Result<(), StoreError>;

    /// Replaces a `ConfigMap` wholesale.
    ///
    /// Fails with [`StoreError::Conflict`] if the object's `resourceVersion` is stale.
    async fn update(&self, config_map: &ConfigMap) -> Result<(), StoreError>;
}

/// [`ConfigMapStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeConfigMapStore {
    client: Client,
}

impl KubeConfigMapStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ConfigMapStore for KubeConfigMapStore {
    async fn get(&self, key: &ResourceKey) -> Result<Option<ConfigMap>, StoreError> {
        debug!(namespace = %key.namespace, name = %key.name, "Fetching ConfigMap");
        Ok(self.api(&key.namespace).get_opt(&key.name).await?)
    }

    async fn create(&self, config_map: &ConfigMap) -> Result<(), StoreError> {
        let key = ResourceKey::of(config_map).ok_or(StoreError::MissingName)?;
        debug!(namespace = %key.namespace, name = %key.name, "Creating ConfigMap");
        self.api(&key.namespace)
            .create(&PostParams::default(), config_map)
            .await
            .map_err(|e| map_write_error(&key, e))?;
        Ok(())
    }

    async fn update(&self, config_map: &ConfigMap) -> Result<(), StoreError> {
        let key = ResourceKey::of(config_map).ok_or(StoreError::MissingName)?;
        debug!(
            namespace = %key.namespace,
            name = %key.name,
            resource_version = ?config_map.resource_version(),
            "Replacing ConfigMap"
        );
        self.api(&key.namespace)
            .replace(&key.name, &PostParams::default(), config_map)
            .await
            .map_err(|e| map_write_error(&key, e))?;
        Ok(())
    }
}

/// Maps API conflicts (HTTP 409) to [`StoreError::Conflict`].
pub(crate) fn map_write_error(key: &ResourceKey, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(api_err) if api_err.code == HTTP_CONFLICT => StoreError::Conflict {
            resource: key.to_string(),
            message: api_err.message.clone(),
        },
        other => StoreError::Kube(other),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
