//! Peer endpoint resolution using the core/v1 `Endpoints` API.
//!
//! Each call performs one point-in-time read of the `Endpoints` object for a
//! service and returns the addresses of every subset, ready addresses first:
//!
//! 1. Ready addresses of all subsets, in subset order
//! 2. Not-ready addresses of all subsets, in subset order
//!
//! Addresses are the literal IPs recorded by Kubernetes. Duplicates are kept.
//! A disabled, uninitialized or shut down resolver and a missing `Endpoints`
//! object all resolve to an empty list. Query failures are returned as errors
//! so callers can tell "no peers yet" from "discovery is broken".

use std::time::Duration;

use k8s_openapi::api::core::v1::{EndpointAddress, Endpoints};
use kube::Client;

use crate::config::ResolverConfig;
use crate::connection::{ConnectionManager, EndpointsSource};
use crate::error::{Error, Result};
use crate::hostname;

/// Resolves the addresses of a service's pods from the Kubernetes API.
///
/// Owns the [`ConnectionManager`] it queries through.
#[derive(Debug)]
pub struct EndpointResolver<S = Client> {
    connection: ConnectionManager<S>,
}

impl<S: EndpointsSource> EndpointResolver<S> {
    /// Creates a resolver that queries through `connection`.
    #[must_use]
    pub fn new(connection: ConnectionManager<S>) -> Self {
        Self { connection }
    }

    /// The connection this resolver queries through.
    #[must_use]
    pub fn connection(&self) -> &ConnectionManager<S> {
        &self.connection
    }

    /// Whether resolution is enabled by configuration.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.connection.is_enabled()
    }

    /// Releases the Kubernetes client. Later resolutions return empty lists.
    pub fn shutdown(&self) {
        self.connection.shutdown();
    }

    /// Derives this instance's deployment name from its hostname.
    ///
    /// See [`hostname::deployment_name`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn find_deployment_name(&self) -> String {
        hostname::deployment_name()
    }

    /// Resolves the endpoints of this instance's own deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the Kubernetes query fails.
    pub async fn find_own_endpoints(&self) -> Result<Vec<String>> {
        let hostname = hostname::hostname();
        self.find_endpoints_for_host(hostname.as_deref()).await
    }

    async fn find_endpoints_for_host(&self, hostname: Option<&str>) -> Result<Vec<String>> {
        let service_name = hostname::derive(hostname);
        tracing::info!("Resolving endpoints for own deployment {service_name}");
        self.find_endpoints(service_name).await
    }

    /// Resolves the ready and not-ready endpoints of `service_name`.
    ///
    /// Returns an empty list when resolution is unavailable or the service
    /// has no `Endpoints` object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the Kubernetes query fails.
    pub async fn find_endpoints(&self, service_name: &str) -> Result<Vec<String>> {
        let Some(source) = self.connection.handle() else {
            tracing::debug!("Kubernetes connection unavailable, no endpoints for {service_name}");
            return Ok(Vec::new());
        };

        let namespace = self.connection.config().namespace();

        if service_name.is_empty() {
            tracing::debug!("Empty service name, no endpoints in {namespace}");
            return Ok(Vec::new());
        }

        let endpoints = source.get_endpoints(namespace, service_name).await?;
        if endpoints.is_none() {
            tracing::debug!("No endpoints object found for {namespace}/{service_name}");
        }

        let addresses = extract_addresses(endpoints);
        tracing::info!(
            "Got {} ready and {} not ready endpoints for {namespace}/{service_name}",
            addresses.ready.len(),
            addresses.not_ready.len()
        );

        let result = addresses.into_ordered();
        tracing::info!("Resolved endpoints for {namespace}/{service_name}: {result:?}");

        Ok(result)
    }

    /// Like [`find_endpoints`](Self::find_endpoints), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the query does not complete in time, or
    /// [`Error::Transport`] if it fails.
    pub async fn find_endpoints_with_timeout(
        &self,
        service_name: &str,
        timeout: Duration,
    ) -> Result<Vec<String>> {
        tokio::time::timeout(timeout, self.find_endpoints(service_name))
            .await
            .map_err(|_| Error::Timeout(timeout))?
    }
}

impl EndpointResolver<Client> {
    /// Creates a resolver backed by a Kubernetes client built from `config`.
    ///
    /// Call [`initialize`](Self::initialize) before resolving.
    #[must_use]
    pub fn from_config(config: ResolverConfig) -> Self {
        Self::new(ConnectionManager::new(config))
    }

    /// Builds the Kubernetes client. See [`ConnectionManager::initialize`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client cannot be configured.
    pub async fn initialize(&self) -> Result<()> {
        self.connection.initialize().await
    }
}

/// Addresses of an `Endpoints` object split by readiness.
#[derive(Debug, Default, PartialEq, Eq)]
struct Addresses {
    ready: Vec<String>,
    not_ready: Vec<String>,
}

impl Addresses {
    fn into_ordered(self) -> Vec<String> {
        let mut result = self.ready;
        result.extend(self.not_ready);
        result
    }
}

/// Flattens the subsets of an `Endpoints` object into ready and not-ready
/// address lists. Missing objects, subsets and address lists count as empty.
fn extract_addresses(endpoints: Option<Endpoints>) -> Addresses {
    let subsets = endpoints.and_then(|e| e.subsets).unwrap_or_default();
    let mut addresses = Addresses::default();

    for subset in subsets {
        addresses.ready.extend(ips(subset.addresses));
        addresses.not_ready.extend(ips(subset.not_ready_addresses));
    }

    addresses
}

fn ips(addresses: Option<Vec<EndpointAddress>>) -> impl Iterator<Item = String> {
    addresses.unwrap_or_default().into_iter().map(|addr| addr.ip)
}
