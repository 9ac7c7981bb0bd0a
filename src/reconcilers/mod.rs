// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation logic for the DNS operator.
//!
//! # Reconciliation Architecture
//!
//! The operator follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - Monitor `DNS` resources and the `ConfigMap`s they own
//! 2. **Reconcile** - Render the Corefile from the `DNS` spec and compare it with
//!    the stored `ConfigMap`
//! 3. **Update** - Create or update the `ConfigMap` only when its data differs
//!
//! # Available Reconcilers
//!
//! - [`reconcile_dns`] - Converges the Corefile `ConfigMap` of a `DNS`
//! - [`ensure_dns_configmap`] - The store-agnostic convergence engine
//!
//! # Example: Using a Reconciler
//!
//! ```rust,no_run
//! use dns_operator::config::OperatorConfig;
//! use dns_operator::context::Context;
//! use dns_operator::crd::DNS;
//! use dns_operator::reconcilers::reconcile_dns;
//! use kube::Client;
//! use std::sync::Arc;
//!
//! async fn reconcile(client: Client, dns: DNS) -> anyhow::Result<()> {
//!     let ctx = Arc::new(Context::new(client, OperatorConfig::default()));
//!     let outcome = reconcile_dns(ctx, dns).await?;
//!     println!("changed: {}", outcome.changed);
//!     Ok(())
//! }
//! ```

pub mod dns;
pub mod dns_configmap;

pub use dns::reconcile_dns;
pub use dns_configmap::{configmap_changed, configmap_diff, ensure_dns_configmap, ConfigMapOutcome};
