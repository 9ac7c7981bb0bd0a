// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `corefile`

#[cfg(test)]
mod tests {
    use crate::corefile::{
        build_corefile, effective_upstream_resolvers, forwarding_policy_name,
        log_level_directive, upstream_resolver,
    };
    use crate::crd::{
        DNSLogLevel, DNSSpec, ForwardPlugin, ForwardingPolicy, Server, Upstream,
        UpstreamResolvers,
    };
    use crate::dns_errors::CorefileError;

    const DEFAULT_COREFILE: &str = ".:5353 {
    bufsize 512
    errors
    log . {
        class error
    }
    health {
        lameduck 20s
    }
    ready
    kubernetes cluster.local in-addr.arpa ip6.arpa {
        pods insecure
        fallthrough in-addr.arpa ip6.arpa
    }
    prometheus 127.0.0.1:9153
    forward . /etc/resolv.conf {
        policy sequential
    }
    cache 900 {
        denial 9984 30
    }
    reload
}
";

    fn network(address: &str, port: Option<u16>) -> Upstream {
        Upstream::Network {
            address: address.to_string(),
            port,
        }
    }

    fn create_test_spec() -> DNSSpec {
        DNSSpec {
            servers: vec![
                Server {
                    name: "foo".to_string(),
                    zones: vec!["foo.com".to_string()],
                    forward_plugin: Some(ForwardPlugin {
                        upstreams: vec![network("1.1.1.1", None), network("2.2.2.2", Some(5353))],
                        policy: Some(ForwardingPolicy::RoundRobin),
                    }),
                },
                Server {
                    name: "bar".to_string(),
                    zones: vec!["bar.com".to_string(), "example.com".to_string()],
                    forward_plugin: Some(ForwardPlugin {
                        upstreams: vec![network("3.3.3.3", None), network("4.4.4.4", Some(5454))],
                        policy: Some(ForwardingPolicy::Random),
                    }),
                },
            ],
            upstream_resolvers: UpstreamResolvers {
                upstreams: vec![
                    Upstream::SystemResolvConf,
                    network("1.2.3.4", Some(53)),
                ],
                policy: Some(ForwardingPolicy::RoundRobin),
            },
            log_level: None,
        }
    }

    #[test]
    fn test_default_spec_renders_catch_all_block_only() {
        let corefile = build_corefile(&DNSSpec::default(), "").unwrap();
        assert_eq!(corefile, DEFAULT_COREFILE);
    }

    #[test]
    fn test_full_spec_renders_expected_document() {
        let expected = "# foo
foo.com:5353 {
    prometheus 127.0.0.1:9153
    forward . 1.1.1.1 2.2.2.2:5353 {
        policy round_robin
    }
    errors
    log . {
        class error
    }
    bufsize 512
    cache 900 {
        denial 9984 30
    }
}
# bar
bar.com:5353 example.com:5353 {
    prometheus 127.0.0.1:9153
    forward . 3.3.3.3 4.4.4.4:5454 {
        policy random
    }
    errors
    log . {
        class error
    }
    bufsize 512
    cache 900 {
        denial 9984 30
    }
}
.:5353 {
    bufsize 512
    errors
    log . {
        class error
    }
    health {
        lameduck 20s
    }
    ready
    kubernetes cluster.local in-addr.arpa ip6.arpa {
        pods insecure
        fallthrough in-addr.arpa ip6.arpa
    }
    prometheus 127.0.0.1:9153
    forward . /etc/resolv.conf 1.2.3.4:53 {
        policy round_robin
    }
    cache 900 {
        denial 9984 30
    }
    reload
}
";
        let corefile = build_corefile(&create_test_spec(), "cluster.local").unwrap();
        assert_eq!(corefile, expected);
    }

    #[test]
    fn test_build_corefile_is_deterministic() {
        let spec = create_test_spec();
        let first = build_corefile(&spec, "cluster.local").unwrap();
        let second = build_corefile(&spec, "cluster.local").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_cluster_domain() {
        let corefile = build_corefile(&DNSSpec::default(), "example.internal").unwrap();
        assert!(corefile.contains("    kubernetes example.internal in-addr.arpa ip6.arpa {\n"));
        assert!(!corefile.contains("cluster.local"));
    }

    #[test]
    fn test_server_without_forward_plugin_has_no_forward_directive() {
        let spec = DNSSpec {
            servers: vec![Server {
                name: "local".to_string(),
                zones: vec!["local.example.com".to_string()],
                forward_plugin: None,
            }],
            ..Default::default()
        };

        let corefile = build_corefile(&spec, "").unwrap();
        let expected_block = "# local
local.example.com:5353 {
    \n    errors
    log . {
        class error
    }
    bufsize 512
    cache 900 {
        denial 9984 30
    }
}
";
        assert!(corefile.starts_with(expected_block));
        // Only the catch-all block forwards
        assert_eq!(corefile.matches("forward .").count(), 1);
    }

    #[test]
    fn test_log_level_applies_to_every_block() {
        let mut spec = create_test_spec();
        spec.log_level = Some(DNSLogLevel::Debug);

        let corefile = build_corefile(&spec, "").unwrap();
        assert_eq!(corefile.matches("        class denial error\n").count(), 3);
        assert!(!corefile.contains("        class error\n"));
    }

    #[test]
    fn test_trace_log_level() {
        let spec = DNSSpec {
            log_level: Some(DNSLogLevel::Trace),
            ..Default::default()
        };
        let corefile = build_corefile(&spec, "").unwrap();
        assert!(corefile.contains("    log . {\n        class all\n    }\n"));
    }

    #[test]
    fn test_missing_address_in_upstream_resolvers_fails() {
        let spec = DNSSpec {
            upstream_resolvers: UpstreamResolvers {
                upstreams: vec![Upstream::SystemResolvConf, network("", Some(53))],
                policy: None,
            },
            ..Default::default()
        };

        let err = build_corefile(&spec, "").unwrap_err();
        assert_eq!(err, CorefileError::MissingNetworkAddress);
        assert_eq!(
            err.to_string(),
            "The address field is mandatory for upstream of type Network, but was not provided"
        );
    }

    #[test]
    fn test_missing_address_in_server_forward_plugin_fails() {
        let mut spec = create_test_spec();
        spec.servers[1].forward_plugin = Some(ForwardPlugin {
            upstreams: vec![network("3.3.3.3", None), network("", None)],
            policy: None,
        });

        assert_eq!(
            build_corefile(&spec, "").unwrap_err(),
            CorefileError::MissingNetworkAddress
        );
    }

    #[test]
    fn test_empty_upstreams_default_to_resolv_conf_sequential() {
        // Declared policy is ignored when no upstreams are given
        let resolvers = UpstreamResolvers {
            upstreams: vec![],
            policy: Some(ForwardingPolicy::RoundRobin),
        };

        let effective = effective_upstream_resolvers(&resolvers);
        assert_eq!(effective.upstreams, vec![Upstream::SystemResolvConf]);
        assert_eq!(effective.policy, Some(ForwardingPolicy::Sequential));

        let spec = DNSSpec {
            upstream_resolvers: resolvers,
            ..Default::default()
        };
        let corefile = build_corefile(&spec, "").unwrap();
        assert!(corefile.contains("    forward . /etc/resolv.conf {\n        policy sequential\n"));
    }

    #[test]
    fn test_supplied_upstreams_without_policy_render_random() {
        let spec = DNSSpec {
            upstream_resolvers: UpstreamResolvers {
                upstreams: vec![network("10.0.0.1", None)],
                policy: None,
            },
            ..Default::default()
        };

        let corefile = build_corefile(&spec, "").unwrap();
        assert!(corefile.contains("    forward . 10.0.0.1 {\n        policy random\n"));
    }

    #[test]
    fn test_upstream_resolver_rendering() {
        assert_eq!(
            upstream_resolver(&network("10.0.0.1", Some(53))).unwrap(),
            "10.0.0.1:53"
        );
        assert_eq!(
            upstream_resolver(&network("10.0.0.1", Some(0))).unwrap(),
            "10.0.0.1"
        );
        assert_eq!(
            upstream_resolver(&network("10.0.0.1", None)).unwrap(),
            "10.0.0.1"
        );
        assert_eq!(
            upstream_resolver(&Upstream::SystemResolvConf).unwrap(),
            "/etc/resolv.conf"
        );
    }

    #[test]
    fn test_unrecognized_upstream_renders_resolv_conf() {
        assert_eq!(
            upstream_resolver(&Upstream::Unrecognized).unwrap(),
            "/etc/resolv.conf"
        );

        let spec = DNSSpec {
            upstream_resolvers: UpstreamResolvers {
                upstreams: vec![Upstream::Unrecognized, network("1.1.1.1", None)],
                policy: Some(ForwardingPolicy::Sequential),
            },
            ..Default::default()
        };

        let corefile = build_corefile(&spec, "").unwrap();
        assert!(corefile.contains("    forward . /etc/resolv.conf 1.1.1.1 {\n"));
    }

    #[test]
    fn test_upstream_resolver_brackets_ipv6() {
        assert_eq!(
            upstream_resolver(&network("fd00::53", Some(5353))).unwrap(),
            "[fd00::53]:5353"
        );
        assert_eq!(
            upstream_resolver(&network("fd00::53", None)).unwrap(),
            "fd00::53"
        );
    }

    #[test]
    fn test_upstream_resolver_rejects_empty_address() {
        assert_eq!(
            upstream_resolver(&network("", Some(53))),
            Err(CorefileError::MissingNetworkAddress)
        );
    }

    #[test]
    fn test_forwarding_policy_names() {
        assert_eq!(forwarding_policy_name(Some(ForwardingPolicy::Random)), "random");
        assert_eq!(
            forwarding_policy_name(Some(ForwardingPolicy::RoundRobin)),
            "round_robin"
        );
        assert_eq!(
            forwarding_policy_name(Some(ForwardingPolicy::Sequential)),
            "sequential"
        );
        assert_eq!(
            forwarding_policy_name(Some(ForwardingPolicy::Unrecognized)),
            "random"
        );
        assert_eq!(forwarding_policy_name(None), "random");
    }

    #[test]
    fn test_log_level_directives() {
        assert_eq!(log_level_directive(Some(DNSLogLevel::Normal)), "class error");
        assert_eq!(
            log_level_directive(Some(DNSLogLevel::Debug)),
            "class denial error"
        );
        assert_eq!(log_level_directive(Some(DNSLogLevel::Trace)), "class all");
        assert_eq!(
            log_level_directive(Some(DNSLogLevel::Unrecognized)),
            "class error"
        );
        assert_eq!(log_level_directive(None), "class error");
    }

    #[test]
    fn test_unknown_policy_string_deserializes_as_unrecognized() {
        let resolvers: UpstreamResolvers = serde_json::from_value(serde_json::json!({
            "upstreams": [{"type": "Network", "address": "10.0.0.1"}],
            "policy": "LeastLoaded"
        }))
        .unwrap();

        assert_eq!(resolvers.policy, Some(ForwardingPolicy::Unrecognized));
        let spec = DNSSpec {
            upstream_resolvers: resolvers,
            ..Default::default()
        };
        let corefile = build_corefile(&spec, "").unwrap();
        assert!(corefile.contains("        policy random\n"));
    }
}
