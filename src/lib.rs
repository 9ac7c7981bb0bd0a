// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # DNS Operator - CoreDNS Corefile management for Kubernetes
//!
//! The DNS operator watches the cluster-scoped `DNS` custom resource
//! (`operator.openshift.io/v1`) and keeps the CoreDNS Corefile `ConfigMap`
//! `dns-<name>` in the operand namespace consistent with it.
//!
//! ## Overview
//!
//! This library provides the core functionality of the operator:
//!
//! - Custom Resource Definition types for the `DNS` resource
//! - Deterministic Corefile generation from a `DNS` spec
//! - Convergence of the Corefile `ConfigMap` with optimistic concurrency
//! - Integration with the Kubernetes API server
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types for the `DNS` resource
//! - [`corefile`] - Corefile generation
//! - [`dns_resources`] - `ConfigMap` identity and builders
//! - [`store`] - `ConfigMap` storage abstraction and its Kubernetes implementation
//! - [`reconcilers`] - Reconciliation logic
//! - [`context`] - Shared context for the controller
//!
//! ## Example
//!
//! ```rust
//! use dns_operator::corefile::build_corefile;
//! use dns_operator::crd::{DNSSpec, ForwardingPolicy, Upstream, UpstreamResolvers};
//!
//! let spec = DNSSpec {
//!     upstream_resolvers: UpstreamResolvers {
//!         upstreams: vec![Upstream::Network {
//!             address: "1.1.1.1".to_string(),
//!             port: Some(53),
//!         }],
//!         policy: Some(ForwardingPolicy::RoundRobin),
//!     },
//!     ..Default::default()
//! };
//!
//! let corefile = build_corefile(&spec, "cluster.local").unwrap();
//! assert!(corefile.contains("forward . 1.1.1.1:53 {"));
//! assert!(corefile.contains("policy round_robin"));
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod corefile;
pub mod crd;
pub mod dns_errors;
pub mod dns_resources;
pub mod labels;
pub mod metrics;
pub mod reconcilers;
pub mod store;

#[cfg(test)]
mod corefile_tests;
#[cfg(test)]
mod dns_errors_tests;
