//! Peer discovery example for kube-peer-endpoints.
//!
//! Resolves the endpoints of this pod's own deployment (or of an explicitly
//! named service) and prints them, ready addresses first.
//!
//! # Running in Kubernetes
//!
//! The pod's service account needs `get` permission on `endpoints` in the
//! target namespace.
//!
//! # Running locally
//!
//! Start `kubectl proxy --port 8001` and set `KUBERNETES_URL=http://localhost:8001`.
//!
//! # Environment Variables
//!
//! - `KUBERNETES_URL`: API server URL (default: inferred from the environment)
//! - `KUBERNETES_NAMESPACE`: Namespace to query (default: default)
//! - `KUBERNETES_ENABLED`: Set to `false` to disable resolution (default: true)
//! - `SERVICE_NAME`: Service to resolve (default: derived from `HOSTNAME`)
//! - `RESOLVE_TIMEOUT_MS`: Milliseconds to wait for the API server (default: 5000)

use std::env;
use std::time::Duration;

use kube_peer_endpoints::{EndpointResolver, ResolverConfig};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    // Read configuration from environment
    let url = env::var("KUBERNETES_URL").unwrap_or_default();
    let namespace = env::var("KUBERNETES_NAMESPACE").unwrap_or_else(|_| "default".to_string());
    let enabled = env::var("KUBERNETES_ENABLED")
        .ok()
        .and_then(|e| e.parse().ok())
        .unwrap_or(true);
    let service_name = env::var("SERVICE_NAME").ok();
    let timeout_ms: u64 = env::var("RESOLVE_TIMEOUT_MS")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(5000);

    let config = ResolverConfig::new(namespace).url(url).enabled(enabled);
    let resolver = EndpointResolver::from_config(config);
    resolver.initialize().await?;

    let service_name = service_name.unwrap_or_else(|| resolver.find_deployment_name());
    info!("Service: {service_name}");

    let peers = resolver
        .find_endpoints_with_timeout(&service_name, Duration::from_millis(timeout_ms))
        .await?;

    if peers.is_empty() {
        info!("No peers found");
    }

    for peer in &peers {
        println!("{peer}");
    }

    resolver.shutdown();

    Ok(())
}
