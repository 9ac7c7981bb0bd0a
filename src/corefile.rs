// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CoreDNS `Corefile` generation.
//!
//! Renders a [`DNSSpec`] into the text CoreDNS reads as its configuration. The
//! document has one block per configured server followed by a catch-all block
//! for the root zone that serves the cluster domain through the kubernetes
//! plugin and forwards everything else to the upstream resolvers.
//!
//! All functions are pure: the same spec and cluster domain always produce the
//! same bytes, which is what lets the reconciler skip no-op updates.
//!
//! # Example
//!
//! ```rust
//! use dns_operator::corefile::build_corefile;
//! use dns_operator::crd::DNSSpec;
//!
//! let corefile = build_corefile(&DNSSpec::default(), "").unwrap();
//! assert!(corefile.contains("kubernetes cluster.local in-addr.arpa ip6.arpa {"));
//! assert!(corefile.contains("forward . /etc/resolv.conf {"));
//! ```

use crate::constants::{
    BUFSIZE, CACHE_DENIAL_CAPACITY, CACHE_DENIAL_TTL_SECS, CACHE_TTL_SECS, COREDNS_METRICS_ADDRESS,
    COREDNS_PORT, DEFAULT_CLUSTER_DOMAIN, HEALTH_LAMEDUCK, RESOLV_CONF, REVERSE_ZONES,
};
use crate::crd::{DNSLogLevel, DNSSpec, ForwardingPolicy, Server, Upstream, UpstreamResolvers};
use crate::dns_errors::CorefileError;
use std::fmt::Write;

/// Builds the Corefile for a `DNS` spec.
///
/// An empty `cluster_domain` falls back to `cluster.local`.
///
/// # Errors
///
/// Returns [`CorefileError::MissingNetworkAddress`] if any `Network` upstream,
/// in a server's forward plugin or in the upstream resolvers, has an empty
/// address. Nothing is rendered in that case.
pub fn build_corefile(spec: &DNSSpec, cluster_domain: &str) -> Result<String, CorefileError> {
    let cluster_domain = if cluster_domain.is_empty() {
        DEFAULT_CLUSTER_DOMAIN
    } else {
        cluster_domain
    };
    let upstream_resolvers = effective_upstream_resolvers(&spec.upstream_resolvers);

    for server in &spec.servers {
        if let Some(forward) = &server.forward_plugin {
            validate_upstreams(&forward.upstreams)?;
        }
    }
    validate_upstreams(&upstream_resolvers.upstreams)?;

    let log_level = log_level_directive(spec.log_level);
    let mut corefile = String::new();

    for server in &spec.servers {
        write_server_block(&mut corefile, server, log_level)?;
    }
    write_default_block(&mut corefile, cluster_domain, &upstream_resolvers, log_level)?;

    Ok(corefile)
}

/// Resolves the upstreams used by the catch-all block.
///
/// With no upstreams configured this is `/etc/resolv.conf` with the
/// `Sequential` policy, whatever policy is declared. Otherwise the configured
/// upstreams and declared policy are used as-is; an unset policy then renders
/// through [`forwarding_policy_name`] like any other.
#[must_use]
pub fn effective_upstream_resolvers(resolvers: &UpstreamResolvers) -> UpstreamResolvers {
    if resolvers.upstreams.is_empty() {
        return UpstreamResolvers {
            upstreams: vec![Upstream::SystemResolvConf],
            policy: Some(ForwardingPolicy::Sequential),
        };
    }
    resolvers.clone()
}

fn validate_upstreams(upstreams: &[Upstream]) -> Result<(), CorefileError> {
    for upstream in upstreams {
        if let Upstream::Network { address, .. } = upstream {
            if address.is_empty() {
                return Err(CorefileError::MissingNetworkAddress);
            }
        }
    }
    Ok(())
}

/// Renders an upstream as a `forward` plugin target.
///
/// `Network` upstreams render as `address` or, with a positive port,
/// `address:port` (IPv6 addresses are bracketed). Every other upstream type
/// renders as `/etc/resolv.conf`.
///
/// # Errors
///
/// Returns [`CorefileError::MissingNetworkAddress`] for a `Network` upstream
/// with an empty address.
pub fn upstream_resolver(upstream: &Upstream) -> Result<String, CorefileError> {
    match upstream {
        Upstream::Network { address, .. } if address.is_empty() => {
            Err(CorefileError::MissingNetworkAddress)
        }
        Upstream::Network {
            address,
            port: Some(port),
        } if *port > 0 => Ok(join_host_port(address, *port)),
        Upstream::Network { address, .. } => Ok(address.clone()),
        Upstream::SystemResolvConf | Upstream::Unrecognized => Ok(RESOLV_CONF.to_string()),
    }
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Maps a forwarding policy to the name the `forward` plugin expects.
///
/// Unset and unrecognized policies map to `random`.
#[must_use]
pub fn forwarding_policy_name(policy: Option<ForwardingPolicy>) -> &'static str {
    match policy {
        Some(ForwardingPolicy::RoundRobin) => "round_robin",
        Some(ForwardingPolicy::Sequential) => "sequential",
        Some(ForwardingPolicy::Random | ForwardingPolicy::Unrecognized) | None => "random",
    }
}

/// Maps a log level to the `class` directive of the `log` plugin.
///
/// Unset and unrecognized levels map to `class error`.
#[must_use]
pub fn log_level_directive(level: Option<DNSLogLevel>) -> &'static str {
    match level {
        Some(DNSLogLevel::Debug) => "class denial error",
        Some(DNSLogLevel::Trace) => "class all",
        Some(DNSLogLevel::Normal | DNSLogLevel::Unrecognized) | None => "class error",
    }
}

fn write_server_block(
    out: &mut String,
    server: &Server,
    log_level: &str,
) -> Result<(), CorefileError> {
    writeln!(out, "# {}", server.name)?;
    for zone in &server.zones {
        write!(out, "{zone}:{COREDNS_PORT} ")?;
    }
    writeln!(out, "{{")?;

    if let Some(forward) = &server.forward_plugin {
        writeln!(out, "    prometheus {COREDNS_METRICS_ADDRESS}")?;
        write_forward(out, &forward.upstreams, forward.policy)?;
    } else {
        // Existing Corefiles carry a blank indented line here.
        writeln!(out, "    ")?;
    }

    writeln!(out, "    errors")?;
    write_log(out, log_level)?;
    writeln!(out, "    bufsize {BUFSIZE}")?;
    write_cache(out)?;
    writeln!(out, "}}")?;
    Ok(())
}

fn write_default_block(
    out: &mut String,
    cluster_domain: &str,
    upstream_resolvers: &UpstreamResolvers,
    log_level: &str,
) -> Result<(), CorefileError> {
    writeln!(out, ".:{COREDNS_PORT} {{")?;
    writeln!(out, "    bufsize {BUFSIZE}")?;
    writeln!(out, "    errors")?;
    write_log(out, log_level)?;
    writeln!(out, "    health {{")?;
    writeln!(out, "        lameduck {HEALTH_LAMEDUCK}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    ready")?;
    writeln!(out, "    kubernetes {cluster_domain} {REVERSE_ZONES} {{")?;
    writeln!(out, "        pods insecure")?;
    writeln!(out, "        fallthrough {REVERSE_ZONES}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    prometheus {COREDNS_METRICS_ADDRESS}")?;
    write_forward(out, &upstream_resolvers.upstreams, upstream_resolvers.policy)?;
    write_cache(out)?;
    writeln!(out, "    reload")?;
    writeln!(out, "}}")?;
    Ok(())
}

fn write_forward(
    out: &mut String,
    upstreams: &[Upstream],
    policy: Option<ForwardingPolicy>,
) -> Result<(), CorefileError> {
    write!(out, "    forward .")?;
    for upstream in upstreams {
        write!(out, " {}", upstream_resolver(upstream)?)?;
    }
    writeln!(out, " {{")?;
    writeln!(out, "        policy {}", forwarding_policy_name(policy))?;
    writeln!(out, "    }}")?;
    Ok(())
}

fn write_log(out: &mut String, log_level: &str) -> Result<(), CorefileError> {
    writeln!(out, "    log . {{")?;
    writeln!(out, "        {log_level}")?;
    writeln!(out, "    }}")?;
    Ok(())
}

fn write_cache(out: &mut String) -> Result<(), CorefileError> {
    writeln!(out, "    cache {CACHE_TTL_SECS} {{")?;
    writeln!(
        out,
        "        denial {CACHE_DENIAL_CAPACITY} {CACHE_DENIAL_TTL_SECS}"
    )?;
    writeln!(out, "    }}")?;
    Ok(())
}
