// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the DNS controller.
//!
//! The controller receives an `Arc<Context>` holding the `ConfigMap` store and
//! the operator configuration consumed by every reconciliation.

use crate::config::OperatorConfig;
use crate::store::{ConfigMapStore, KubeConfigMapStore};
use kube::Client;
use std::sync::Arc;

/// Shared context passed to the `DNS` reconciler.
#[derive(Clone)]
pub struct Context {
    /// Store the Corefile `ConfigMap` is read from and written to
    pub store: Arc<dyn ConfigMapStore>,

    /// Operator configuration
    pub config: OperatorConfig,
}

impl Context {
    /// Creates a context backed by the Kubernetes API.
    #[must_use]
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        Self::with_store(Arc::new(KubeConfigMapStore::new(client)), config)
    }

    /// Creates a context with an explicit store.
    #[must_use]
    pub fn with_store(store: Arc<dyn ConfigMapStore>, config: OperatorConfig) -> Self {
        Self { store, config }
    }
}
