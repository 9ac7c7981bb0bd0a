// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definition for the cluster DNS service.
//!
//! The [`DNS`] resource is the declarative desired state the operator converges
//! the CoreDNS `Corefile` `ConfigMap` to.
//!
//! # Example: Forwarding a zone to dedicated upstreams
//!
//! ```rust,no_run
//! use dns_operator::crd::{
//!     DNSLogLevel, DNSSpec, ForwardPlugin, ForwardingPolicy, Server, Upstream,
//! };
//!
//! let spec = DNSSpec {
//!     servers: vec![Server {
//!         name: "corp".to_string(),
//!         zones: vec!["corp.example.com".to_string()],
//!         forward_plugin: Some(ForwardPlugin {
//!             upstreams: vec![Upstream::Network {
//!                 address: "10.0.0.10".to_string(),
//!                 port: Some(53),
//!             }],
//!             policy: Some(ForwardingPolicy::RoundRobin),
//!         }),
//!     }],
//!     log_level: Some(DNSLogLevel::Debug),
//!     ..Default::default()
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `DNS` manages the CoreDNS component that provides name resolution inside the cluster.
///
/// # Example
///
/// ```yaml
/// apiVersion: operator.openshift.io/v1
/// kind: DNS
/// metadata:
///   name: default
/// spec:
///   servers:
///     - name: corp
///       zones: ["corp.example.com"]
///       forwardPlugin:
///         upstreams:
///           - type: Network
///             address: 10.0.0.10
///             port: 53
///         policy: RoundRobin
///   upstreamResolvers:
///     upstreams:
///       - type: SystemResolvConf
///     policy: Sequential
///   logLevel: Debug
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "operator.openshift.io",
    version = "v1",
    kind = "DNS",
    plural = "dnses",
    doc = "DNS manages the CoreDNS component providing name resolution for pods and services in the cluster. The operator renders its spec into the CoreDNS Corefile ConfigMap."
)]
#[kube(status = "DNSStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSSpec {
    /// Server blocks forwarding specific zones to dedicated upstreams.
    ///
    /// Servers are rendered in order, before the catch-all block for the cluster domain.
    #[serde(default)]
    pub servers: Vec<Server>,

    /// Upstreams used by the catch-all block for names outside the cluster domain.
    ///
    /// When no upstreams are given, `/etc/resolv.conf` is used with the `Sequential` policy.
    #[serde(default)]
    pub upstream_resolvers: UpstreamResolvers,

    /// Logging verbosity of CoreDNS. Defaults to `Normal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<DNSLogLevel>,
}

/// `DNS` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DNSStatus {
    /// Service IP through which the DNS service is reachable.
    #[serde(rename = "clusterIP", skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,

    /// Internal cluster domain served by the kubernetes plugin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_domain: Option<String>,
}

/// A server block: a named group of zones with optional dedicated forwarding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Name of the server block, rendered as a comment above it.
    pub name: String,

    /// Zones this server block is authoritative for forwarding, e.g. `example.com`.
    #[serde(default)]
    pub zones: Vec<String>,

    /// Forwarding configuration for the zones of this server block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_plugin: Option<ForwardPlugin>,
}

/// Forwarding configuration for a server block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForwardPlugin {
    /// Upstreams queries for the server's zones are forwarded to.
    #[serde(default)]
    pub upstreams: Vec<Upstream>,

    /// Upstream selection policy. Unset renders as `random`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ForwardingPolicy>,
}

/// Upstreams used by the catch-all server block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamResolvers {
    /// Upstream resolvers, in order.
    #[serde(default)]
    pub upstreams: Vec<Upstream>,

    /// Upstream selection policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ForwardingPolicy>,
}

/// A single DNS resolver target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Upstream {
    /// The resolvers listed in the host's `/etc/resolv.conf`.
    SystemResolvConf,

    /// A resolver reachable at a network address.
    #[serde(rename_all = "camelCase")]
    Network {
        /// IPv4 or IPv6 address of the resolver. Required.
        #[serde(default)]
        address: String,

        /// Port of the resolver. Unset or zero means the CoreDNS default (53).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        port: Option<u16>,
    },

    /// Any other type. Rendered as `/etc/resolv.conf`.
    #[serde(other)]
    #[schemars(skip)]
    Unrecognized,
}

/// Strategy for picking an upstream when several are configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ForwardingPolicy {
    /// Pick a random upstream for each query.
    Random,
    /// Rotate through upstreams in order.
    RoundRobin,
    /// Always try upstreams in the configured order.
    Sequential,
    /// Any value this operator does not know; rendered as `random`.
    #[serde(other)]
    #[schemars(skip)]
    Unrecognized,
}

/// CoreDNS logging verbosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DNSLogLevel {
    /// Log errors only.
    Normal,
    /// Log errors and NXDOMAIN/NODATA denials.
    Debug,
    /// Log every query.
    Trace,
    /// Any value this operator does not know; rendered as `Normal`.
    #[serde(other)]
    #[schemars(skip)]
    Unrecognized,
}
