// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use dns_operator::{
    config::{LogFormat, OperatorConfig},
    constants::{
        ERROR_REQUEUE_DURATION_SECS, METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PATH,
        SUCCESS_REQUEUE_DURATION_SECS, TOKIO_WORKER_THREADS,
    },
    context::Context,
    crd::DNS,
    dns_resources::owning_dns_refs,
    labels::OWNING_DNS_LABEL,
    metrics::gather_metrics,
    reconcilers::reconcile_dns,
};
use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ReconcileError(#[from] anyhow::Error);

fn main() -> Result<()> {
    let config = OperatorConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("dns-operator")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

/// Initialize logging.
///
/// Format: timestamp file:line LEVEL message
/// Example: 2025-11-29T23:45:00.123456Z main.rs:49 INFO Starting DNS operator
///
/// Respects RUST_LOG if set, otherwise defaults to INFO level.
/// Example: RUST_LOG=debug cargo run
fn init_logging(log_format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: OperatorConfig) -> Result<()> {
    init_logging(config.log_format);

    info!("Starting DNS operator");
    debug!(
        cluster_domain = %config.cluster_domain,
        operand_namespace = %config.operand_namespace,
        metrics_port = config.metrics_port,
        "Loaded operator configuration"
    );

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let metrics_port = config.metrics_port;
    let ctx = Arc::new(Context::new(client.clone(), config));

    // Controllers should never exit - if one fails, we log it and exit the main process
    tokio::select! {
        result = run_dns_controller(client, ctx) => {
            error!("CRITICAL: DNS controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("DNS controller exited unexpectedly without error")
        }
        result = run_metrics_server(metrics_port) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
        signal = shutdown_signal() => {
            let signal = signal?;
            info!("Received {}, initiating graceful shutdown...", signal);
        }
    }

    info!("DNS operator stopped");
    Ok(())
}

/// Run the `DNS` controller
///
/// Watches every `DNS` and the Corefile `ConfigMap`s they own in the operand namespace,
/// so deleting or editing a `ConfigMap` triggers a reconciliation of its owner.
/// `DNS` is cluster scoped, so owners are mapped without the `ConfigMap`'s namespace.
async fn run_dns_controller(client: Client, ctx: Arc<Context>) -> Result<()> {
    info!("Starting DNS controller");

    let api = Api::<DNS>::all(client.clone());
    let config_maps = Api::<ConfigMap>::namespaced(client, &ctx.config.operand_namespace);

    Controller::new(api, Config::default())
        .watches(
            config_maps,
            Config::default().labels(OWNING_DNS_LABEL),
            |config_map| owning_dns_refs(&config_map),
        )
        .run(reconcile_dns_wrapper, error_policy, ctx)
        .for_each(|result| {
            if let Err(e) = result {
                warn!("DNS controller event: {}", e);
            }
            futures::future::ready(())
        })
        .await;

    Ok(())
}

/// Reconcile wrapper for `DNS`
async fn reconcile_dns_wrapper(dns: Arc<DNS>, ctx: Arc<Context>) -> Result<Action, ReconcileError> {
    debug!(dns_name = %dns.name_any(), "Reconcile wrapper called for DNS");

    match reconcile_dns(ctx, (*dns).clone()).await {
        Ok(outcome) => {
            info!(
                changed = outcome.changed,
                "Successfully reconciled DNS: {}",
                dns.name_any()
            );
            Ok(requeue_after_success())
        }
        Err(e) => {
            error!("Failed to reconcile DNS {}: {:#}", dns.name_any(), e);
            Err(e.into())
        }
    }
}

/// Periodic resync so drift introduced outside the watch is corrected
fn requeue_after_success() -> Action {
    Action::requeue(Duration::from_secs(SUCCESS_REQUEUE_DURATION_SECS))
}

fn requeue_after_error() -> Action {
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

/// Error policy for controller
fn error_policy(dns: Arc<DNS>, err: &ReconcileError, _ctx: Arc<Context>) -> Action {
    warn!(
        "Requeueing DNS {} in {}s after error: {}",
        dns.name_any(),
        ERROR_REQUEUE_DURATION_SECS,
        err
    );
    requeue_after_error()
}

fn metrics_router() -> Router {
    Router::new().route(METRICS_SERVER_PATH, get(metrics_handler))
}

async fn metrics_handler() -> (StatusCode, String) {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Serve Prometheus metrics
async fn run_metrics_server(port: u16) -> Result<()> {
    let address = format!("{METRICS_SERVER_BIND_ADDRESS}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Serving metrics on http://{}{}", address, METRICS_SERVER_PATH);

    axum::serve(listener, metrics_router()).await?;
    Ok(())
}

/// Waits for SIGINT or SIGTERM and returns the name of the signal received
async fn shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                Ok("SIGINT")
            }
            _ = sigterm.recv() => Ok("SIGTERM (pod termination)"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("SIGINT")
    }
}
