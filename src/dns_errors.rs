// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for Corefile generation and `ConfigMap` convergence.
//!
//! This module provides specialized error types for:
//! - Corefile rendering and upstream validation
//! - `ConfigMap` store operations (fetch, create, update), including
//!   optimistic-concurrency conflicts reported by the API server
//! - The convergence engine, which wraps the above with the operation that failed
//!   and keeps the partial state known at the time of failure

use k8s_openapi::api::core::v1::ConfigMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while rendering the Corefile from a `DNS` spec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorefileError {
    /// An upstream of type `Network` has an empty address.
    ///
    /// Generation stops at the first such upstream; nothing is rendered.
    #[error("The address field is mandatory for upstream of type Network, but was not provided")]
    MissingNetworkAddress,

    /// Writing the rendered document failed.
    #[error("failed to render Corefile: {0}")]
    Render(#[from] fmt::Error),
}

/// Errors returned by a [`ConfigMapStore`](crate::store::ConfigMapStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write was based on a stale object or the object already exists (HTTP 409).
    ///
    /// The caller should re-read the current state and reconcile again.
    #[error("conflict writing ConfigMap {resource}: {message}")]
    Conflict {
        /// `namespace/name` of the `ConfigMap`
        resource: String,
        /// Message returned by the store
        message: String,
    },

    /// The `ConfigMap` to write has no name.
    #[error("ConfigMap must have a name")]
    MissingName,

    /// Any other Kubernetes API failure.
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl StoreError {
    /// Returns `true` if this error is an optimistic-concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Failures of a single `ConfigMap` convergence step.
#[derive(Error, Debug)]
pub enum ConfigMapError {
    /// Fetching the current `ConfigMap` failed for a reason other than not-found.
    #[error("failed to get configmap: {0}")]
    Get(StoreError),

    /// Building the desired `ConfigMap` failed.
    #[error("failed to build configmap: {0}")]
    Build(CorefileError),

    /// Creating the `ConfigMap` failed.
    #[error("failed to create configmap: {0}")]
    Create(StoreError),

    /// Updating the `ConfigMap` failed, including conflicts.
    #[error("failed to update configmap: {0}")]
    Update(StoreError),

    /// The `ConfigMap` could not be found right after it was written.
    #[error("configmap {0} not found after write")]
    MissingAfterWrite(String),
}

/// A failed convergence, together with the state observed before the failure.
///
/// `existed` tells whether a `ConfigMap` was present when the reconciliation
/// started, and `current` holds it when it was fetched, so callers can log and
/// retry without losing that visibility.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct EnsureConfigMapError {
    /// What failed
    pub error: ConfigMapError,
    /// Whether a `ConfigMap` existed at the start of the reconciliation
    pub existed: bool,
    /// The `ConfigMap` as last fetched, if any
    pub current: Option<ConfigMap>,
}

impl EnsureConfigMapError {
    pub(crate) fn new(error: ConfigMapError, current: Option<ConfigMap>) -> Self {
        Self {
            error,
            existed: current.is_some(),
            current,
        }
    }

    /// Returns `true` if the failure was an optimistic-concurrency conflict on write.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match &self.error {
            ConfigMapError::Create(e) | ConfigMapError::Update(e) => e.is_conflict(),
            _ => false,
        }
    }
}
