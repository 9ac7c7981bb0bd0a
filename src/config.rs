// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! Every setting can be given as a command-line flag or through the
//! environment, e.g. `CLUSTER_DOMAIN=corp.internal dns-operator`.

use crate::constants::{DEFAULT_OPERAND_NAMESPACE, METRICS_SERVER_PORT};
use clap::{Parser, ValueEnum};

/// Runtime configuration of the DNS operator.
#[derive(Clone, Debug, Parser)]
#[command(name = "dns-operator", version, about)]
pub struct OperatorConfig {
    /// Cluster domain served by CoreDNS. Empty means `cluster.local`.
    #[arg(long, env = "CLUSTER_DOMAIN", default_value = "")]
    pub cluster_domain: String,

    /// Namespace the CoreDNS operand and its `ConfigMap` live in.
    #[arg(long, env = "OPERAND_NAMESPACE", default_value = DEFAULT_OPERAND_NAMESPACE)]
    pub operand_namespace: String,

    /// Port the Prometheus metrics endpoint listens on.
    #[arg(long, env = "METRICS_PORT", default_value_t = METRICS_SERVER_PORT)]
    pub metrics_port: u16,

    /// Log output format.
    #[arg(long, env = "RUST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            cluster_domain: String::new(),
            operand_namespace: DEFAULT_OPERAND_NAMESPACE.to_string(),
            metrics_port: METRICS_SERVER_PORT,
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
