// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

use dns_operator::crd::{DNSSpec, DNS};
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{
    api::{Api, DeleteParams, PostParams},
    client::Client,
};
use std::collections::BTreeMap;

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => {
            println!("✓ Successfully connected to Kubernetes cluster");
            Some(client)
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    let mut labels = BTreeMap::new();
    labels.insert("test".to_string(), "integration".to_string());
    labels.insert("managed-by".to_string(), "dns-operator-test".to_string());

    let test_ns = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    };

    match namespaces.create(&PostParams::default(), &test_ns).await {
        Ok(_) => {
            println!("✓ Created test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("  Test namespace already exists: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(client: &Client, name: &str) {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => println!("✓ Deleted test namespace: {name}"),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("  Test namespace already deleted: {name}");
        }
        Err(e) => eprintln!("⚠ Failed to delete test namespace {name}: {e}"),
    }
}

/// Create a `DNS` resource, or return `None` if the CRD is not installed
pub async fn create_dns_or_skip(client: &Client, name: &str, spec: DNSSpec) -> Option<DNS> {
    let api: Api<DNS> = Api::all(client.clone());

    match api.create(&PostParams::default(), &DNS::new(name, spec)).await {
        Ok(dns) => {
            println!("✓ Created DNS: {name}");
            Some(dns)
        }
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            eprintln!("⊘ Skipping integration test: DNS CRD is not installed");
            None
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: failed to create DNS {name}: {e}");
            None
        }
    }
}

/// Delete a `DNS` resource
pub async fn cleanup_dns(client: &Client, name: &str) {
    let api: Api<DNS> = Api::all(client.clone());

    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => println!("✓ Deleted DNS: {name}"),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("  DNS already deleted: {name}");
        }
        Err(e) => eprintln!("⚠ Failed to delete DNS {name}: {e}"),
    }
}
