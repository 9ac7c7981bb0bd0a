// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes resource builders for the DNS operand.
//!
//! This module derives the identity of the Corefile `ConfigMap` from its owning
//! [`DNS`] and builds the desired `ConfigMap`. All functions are pure and easily
//! testable.

use crate::constants::{API_GROUP_VERSION, COREFILE_KEY, DNS_CONFIGMAP_PREFIX, KIND_DNS};
use crate::corefile::build_corefile;
use crate::crd::DNS;
use crate::dns_errors::CorefileError;
use crate::labels::OWNING_DNS_LABEL;
use crate::store::ResourceKey;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::runtime::reflector::ObjectRef;
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::debug;

/// Returns the namespace/name of the Corefile `ConfigMap` for a `DNS`.
///
/// The name is `dns-<dns name>`; the namespace is the operand namespace.
#[must_use]
pub fn dns_configmap_key(dns: &DNS, namespace: &str) -> ResourceKey {
    ResourceKey::new(namespace, format!("{DNS_CONFIGMAP_PREFIX}{}", dns.name_any()))
}

/// Returns the value of the owning-DNS label for resources owned by `dns`.
#[must_use]
pub fn dns_owning_label_value(dns: &DNS) -> String {
    dns.name_any()
}

/// Builds the labels for the Corefile `ConfigMap`.
#[must_use]
pub fn build_labels(dns: &DNS) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(OWNING_DNS_LABEL.into(), dns_owning_label_value(dns));
    labels
}

/// Builds owner references for a resource owned by a `DNS`
///
/// Sets up cascade deletion so that when the `DNS` is deleted, its `ConfigMap`
/// is garbage collected.
#[must_use]
pub fn build_owner_references(dns: &DNS) -> Vec<OwnerReference> {
    vec![OwnerReference {
        api_version: API_GROUP_VERSION.to_string(),
        kind: KIND_DNS.to_string(),
        name: dns.name_any(),
        uid: dns.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: None,
    }]
}

/// Maps a `ConfigMap` to the `DNS` resources that own it.
///
/// `DNS` is cluster scoped while the `ConfigMap` is namespaced, so the
/// returned references carry no namespace. Used by the controller to requeue
/// the owner when its `ConfigMap` changes or is deleted.
#[must_use]
pub fn owning_dns_refs(config_map: &ConfigMap) -> Vec<ObjectRef<DNS>> {
    config_map
        .owner_references()
        .iter()
        .filter(|owner| owner.kind == KIND_DNS && owner.api_version == API_GROUP_VERSION)
        .map(|owner| ObjectRef::new(&owner.name))
        .collect()
}

/// Builds the desired Corefile `ConfigMap` for a `DNS`.
///
/// # Arguments
///
/// * `dns` - The owning `DNS` resource
/// * `cluster_domain` - Cluster domain served by the kubernetes plugin; empty means `cluster.local`
/// * `namespace` - Operand namespace the `ConfigMap` lives in
///
/// # Errors
///
/// Returns an error if the Corefile cannot be rendered, e.g. a `Network`
/// upstream without an address.
pub fn build_dns_configmap(
    dns: &DNS,
    cluster_domain: &str,
    namespace: &str,
) -> Result<ConfigMap, CorefileError> {
    let key = dns_configmap_key(dns, namespace);
    debug!(
        name = %key.name,
        namespace = %key.namespace,
        "Building Corefile ConfigMap for DNS"
    );

    let corefile = build_corefile(&dns.spec, cluster_domain)?;

    let mut data = BTreeMap::new();
    data.insert(COREFILE_KEY.to_string(), corefile);

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(key.name),
            namespace: Some(key.namespace),
            labels: Some(build_labels(dns)),
            owner_references: Some(build_owner_references(dns)),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    })
}
