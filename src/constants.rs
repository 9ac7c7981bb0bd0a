// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the DNS operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the `DNS` CRD
pub const API_GROUP: &str = "operator.openshift.io";

/// API version for the `DNS` CRD
pub const API_VERSION: &str = "v1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "operator.openshift.io/v1";

/// Kind name for `DNS` resource
pub const KIND_DNS: &str = "DNS";

/// Kind name used when recording `ConfigMap` metrics
pub const KIND_CONFIG_MAP: &str = "ConfigMap";

// ============================================================================
// Operand Constants
// ============================================================================

/// Namespace the DNS operand (CoreDNS daemonset and its config) lives in
pub const DEFAULT_OPERAND_NAMESPACE: &str = "openshift-dns";

/// Prefix for the Corefile `ConfigMap` name (`dns-<dns name>`)
pub const DNS_CONFIGMAP_PREFIX: &str = "dns-";

/// `ConfigMap` data key holding the rendered Corefile
pub const COREFILE_KEY: &str = "Corefile";

/// Cluster domain used when the operator is not configured with one
pub const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

// ============================================================================
// Corefile Constants
// ============================================================================

/// Port CoreDNS listens on inside the pod
pub const COREDNS_PORT: u16 = 5353;

/// Address CoreDNS serves Prometheus metrics on
pub const COREDNS_METRICS_ADDRESS: &str = "127.0.0.1:9153";

/// Resolver file used for `SystemResolvConf` upstreams
pub const RESOLV_CONF: &str = "/etc/resolv.conf";

/// EDNS0 buffer size advertised by CoreDNS
pub const BUFSIZE: u16 = 512;

/// Maximum TTL for cached responses (seconds)
pub const CACHE_TTL_SECS: u32 = 900;

/// Capacity of the denial (negative) cache
pub const CACHE_DENIAL_CAPACITY: u32 = 9984;

/// TTL for cached denials (seconds)
pub const CACHE_DENIAL_TTL_SECS: u32 = 30;

/// Lameduck duration for the health plugin
pub const HEALTH_LAMEDUCK: &str = "20s";

/// Reverse lookup zones served by the kubernetes plugin
pub const REVERSE_ZONES: &str = "in-addr.arpa ip6.arpa";

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration after a successful reconciliation (5 minutes)
pub const SUCCESS_REQUEUE_DURATION_SECS: u64 = 300;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";
