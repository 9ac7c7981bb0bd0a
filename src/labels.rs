// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label constants used on resources created by the operator.

/// Label identifying the `DNS` resource that owns an operand resource.
///
/// The value is the owning `DNS` name, shared with the daemonset selector.
pub const OWNING_DNS_LABEL: &str = "dns.operator.openshift.io/owning-dns";
