// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `DNS` reconciliation logic.
//!
//! A `DNS` resource is reconciled by converging its Corefile `ConfigMap` in the
//! operand namespace. Every pass is recorded in the operator metrics.

use crate::constants::{KIND_CONFIG_MAP, KIND_DNS};
use crate::context::Context;
use crate::crd::DNS;
use crate::dns_errors::{ConfigMapError, EnsureConfigMapError};
use crate::metrics;
use crate::reconcilers::dns_configmap::{ensure_dns_configmap, ConfigMapOutcome};
use anyhow::{Context as _, Result};
use kube::ResourceExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Error category for fetch failures
pub const ERROR_TYPE_FETCH: &str = "fetch_error";
/// Error category for specs that cannot be rendered
pub const ERROR_TYPE_VALIDATION: &str = "validation_error";
/// Error category for failed creates and updates
pub const ERROR_TYPE_WRITE: &str = "write_error";
/// Error category for optimistic-concurrency conflicts
pub const ERROR_TYPE_CONFLICT: &str = "conflict";

/// Reconciles a `DNS` resource.
///
/// This function:
/// 1. Renders the Corefile from the `DNS` spec
/// 2. Creates the `dns-<name>` `ConfigMap` in the operand namespace if missing
/// 3. Updates it when the stored Corefile differs
///
/// # Arguments
///
/// * `ctx` - Shared context with the `ConfigMap` store and operator configuration
/// * `dns` - The `DNS` resource to reconcile
///
/// # Returns
///
/// The converged `ConfigMap` and whether it was changed.
///
/// # Errors
///
/// Returns an error wrapping [`EnsureConfigMapError`] if the `ConfigMap`
/// cannot be fetched, rendered, or written.
pub async fn reconcile_dns(ctx: Arc<Context>, dns: DNS) -> Result<ConfigMapOutcome> {
    let name = dns.name_any();
    let start = Instant::now();
    info!("Reconciling DNS: {}", name);
    debug!(
        generation = ?dns.metadata.generation,
        servers = dns.spec.servers.len(),
        upstreams = dns.spec.upstream_resolvers.upstreams.len(),
        "DNS spec"
    );

    let result = ensure_dns_configmap(
        ctx.store.as_ref(),
        &dns,
        &ctx.config.cluster_domain,
        &ctx.config.operand_namespace,
    )
    .await;

    let duration = start.elapsed();
    match result {
        Ok(outcome) => {
            metrics::record_reconciliation_success(KIND_DNS, duration);
            if outcome.changed {
                record_write(&outcome);
            } else {
                debug!("Corefile ConfigMap for DNS {} is up to date", name);
            }
            Ok(outcome)
        }
        Err(e) => {
            metrics::record_reconciliation_error(KIND_DNS, duration);
            metrics::record_error(KIND_DNS, error_type(&e));
            if e.is_conflict() {
                warn!("Conflict writing Corefile ConfigMap for DNS {}: {}", name, e);
            } else {
                error!(
                    existed = e.existed,
                    "Failed to ensure Corefile ConfigMap for DNS {}: {}", name, e
                );
            }
            Err(e).with_context(|| format!("failed to ensure configmap for dns {name}"))
        }
    }
}

fn record_write(outcome: &ConfigMapOutcome) {
    if outcome.created {
        metrics::record_resource_created(KIND_CONFIG_MAP);
    } else {
        metrics::record_resource_updated(KIND_CONFIG_MAP);
    }
}

/// Maps a convergence failure to the error category recorded in metrics.
#[must_use]
pub fn error_type(error: &EnsureConfigMapError) -> &'static str {
    if error.is_conflict() {
        return ERROR_TYPE_CONFLICT;
    }
    match error.error {
        ConfigMapError::Get(_) => ERROR_TYPE_FETCH,
        ConfigMapError::Build(_) => ERROR_TYPE_VALIDATION,
        ConfigMapError::Create(_)
        | ConfigMapError::Update(_)
        | ConfigMapError::MissingAfterWrite(_) => ERROR_TYPE_WRITE,
    }
}

#[cfg(test)]
#[path = "dns_tests.rs"]
mod dns_tests;
