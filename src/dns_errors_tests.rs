// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for DNS error types.

#[cfg(test)]
mod tests {
    use crate::dns_errors::*;
    use k8s_openapi::api::core::v1::ConfigMap;
    use std::error::Error as _;

    fn conflict() -> StoreError {
        StoreError::Conflict {
            resource: "openshift-dns/dns-default".to_string(),
            message: "the object has been modified".to_string(),
        }
    }

    #[test]
    fn test_missing_network_address_error() {
        assert_eq!(
            CorefileError::MissingNetworkAddress.to_string(),
            "The address field is mandatory for upstream of type Network, but was not provided"
        );
    }

    #[test]
    fn test_render_error_from_fmt_error() {
        let error = CorefileError::from(std::fmt::Error);
        assert!(matches!(error, CorefileError::Render(_)));
        assert!(error.to_string().starts_with("failed to render Corefile"));
    }

    #[test]
    fn test_conflict_error() {
        let error = conflict();
        assert!(error.is_conflict());
        assert_eq!(
            error.to_string(),
            "conflict writing ConfigMap openshift-dns/dns-default: the object has been modified"
        );
    }

    #[test]
    fn test_missing_name_is_not_a_conflict() {
        assert!(!StoreError::MissingName.is_conflict());
        assert_eq!(
            StoreError::MissingName.to_string(),
            "ConfigMap must have a name"
        );
    }

    #[test]
    fn test_configmap_error_messages() {
        let build = ConfigMapError::Build(CorefileError::MissingNetworkAddress);
        assert_eq!(
            build.to_string(),
            "failed to build configmap: The address field is mandatory for upstream of type Network, but was not provided"
        );

        let update = ConfigMapError::Update(conflict());
        assert!(update.to_string().starts_with("failed to update configmap: conflict"));

        let get = ConfigMapError::Get(StoreError::MissingName);
        assert_eq!(
            get.to_string(),
            "failed to get configmap: ConfigMap must have a name"
        );

        let missing = ConfigMapError::MissingAfterWrite("openshift-dns/dns-default".to_string());
        assert_eq!(
            missing.to_string(),
            "configmap openshift-dns/dns-default not found after write"
        );
    }

    #[test]
    fn test_ensure_error_keeps_partial_state() {
        let current = ConfigMap::default();
        let error = EnsureConfigMapError::new(ConfigMapError::Update(conflict()), Some(current));

        assert!(error.existed);
        assert!(error.current.is_some());
        assert!(error.is_conflict());
        assert!(error.to_string().starts_with("failed to update configmap"));
    }

    #[test]
    fn test_ensure_error_without_current() {
        let error = EnsureConfigMapError::new(
            ConfigMapError::Build(CorefileError::MissingNetworkAddress),
            None,
        );

        assert!(!error.existed);
        assert!(error.current.is_none());
        assert!(!error.is_conflict());
    }

    #[test]
    fn test_error_chain_reports_cause_once() {
        let error = EnsureConfigMapError::new(ConfigMapError::Create(conflict()), None);
        assert!(error.source().is_none());

        let chain = format!(
            "{:#}",
            anyhow::Error::new(error).context("failed to ensure configmap for dns default")
        );
        assert_eq!(
            chain,
            "failed to ensure configmap for dns default: failed to create configmap: \
             conflict writing ConfigMap openshift-dns/dns-default: the object has been modified"
        );
        assert_eq!(chain.matches("the object has been modified").count(), 1);
    }
}
