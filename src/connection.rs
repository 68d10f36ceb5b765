//! Ownership of the process's Kubernetes client.
//!
//! A [`ConnectionManager`] holds at most one live client. It is written when
//! [`initialize`](ConnectionManager::initialize) succeeds, read by every
//! resolution, and released by [`shutdown`](ConnectionManager::shutdown) or
//! when the manager is dropped.

use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use k8s_openapi::api::core::v1::Endpoints;
use kube::{Api, Client, Config};

use crate::config::ResolverConfig;
use crate::error::{Error, Result};

/// Read access to `Endpoints` objects in the control plane.
///
/// Implemented for [`kube::Client`]. Sources are cloned out of the
/// [`ConnectionManager`] for each query, so cloning should be cheap.
pub trait EndpointsSource: Clone + Send + Sync + 'static {
    /// Fetches the `Endpoints` object `name` in `namespace`.
    ///
    /// Returns `Ok(None)` when the object does not exist.
    fn get_endpoints(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<Endpoints>>> + Send;
}

impl EndpointsSource for Client {
    async fn get_endpoints(&self, namespace: &str, name: &str) -> Result<Option<Endpoints>> {
        let endpoints: Api<Endpoints> = Api::namespaced(self.clone(), namespace);
        Ok(endpoints.get_opt(name).await?)
    }
}

/// Owner of the single control-plane client, gated by
/// [`ResolverConfig::is_enabled`].
#[derive(Debug)]
pub struct ConnectionManager<S = Client> {
    config: ResolverConfig,
    handle: RwLock<Option<S>>,
}

impl<S: EndpointsSource> ConnectionManager<S> {
    /// Creates a manager with no live client. Nothing connects until
    /// [`initialize`](ConnectionManager::initialize) is called.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            handle: RwLock::new(None),
        }
    }

    /// The configuration this manager was created with.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether resolution is enabled by configuration.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Returns the live client, or `None` when disabled, not yet
    /// initialized, or shut down.
    #[must_use]
    pub fn handle(&self) -> Option<S> {
        self.read().clone()
    }

    /// Initializes the manager with a client produced by `connect`.
    ///
    /// When disabled, `connect` is never called and the handle stays absent.
    /// When a client is already live, this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns whatever error `connect` fails with.
    pub async fn initialize_with<F, Fut>(&self, connect: F) -> Result<()>
    where
        F: FnOnce(ResolverConfig) -> Fut,
        Fut: Future<Output = Result<S>>,
    {
        if !self.config.is_enabled() {
            tracing::warn!("Kubernetes connection disabled, peer endpoints will not be resolved");
            return Ok(());
        }

        if self.read().is_some() {
            tracing::debug!("Kubernetes connection already initialized");
            return Ok(());
        }

        let source = connect(self.config.clone()).await?;

        let mut handle = self.write();
        if handle.is_some() {
            tracing::debug!("Kubernetes connection initialized concurrently, discarding new client");
        } else {
            *handle = Some(source);
        }

        Ok(())
    }

    /// Releases the live client, if any. Resolutions started afterwards
    /// behave as if resolution were disabled.
    pub fn shutdown(&self) {
        if self.write().take().is_some() {
            tracing::info!("Closed Kubernetes connection");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<S>> {
        self.handle.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<S>> {
        self.handle.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConnectionManager<Client> {
    /// Builds the Kubernetes client.
    ///
    /// With an explicit URL the client talks to that API server without
    /// authentication, as for `kubectl proxy` or a port-forward. Otherwise
    /// the configuration is inferred from the environment: the in-cluster
    /// service account, or the local kubeconfig.
    ///
    /// Does nothing when disabled or already initialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid or the client cannot
    /// be configured.
    pub async fn initialize(&self) -> Result<()> {
        self.initialize_with(connect).await
    }
}

async fn connect(config: ResolverConfig) -> Result<Client> {
    if let Some(url) = config.control_plane_url() {
        tracing::info!("Connecting to Kubernetes API server at {url}");

        let uri: http::Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| {
                Error::config(format!("invalid API server URL {url}"), e)
            })?;

        let mut kube_config = Config::new(uri);
        kube_config.default_namespace = config.namespace().to_string();

        return Client::try_from(kube_config)
            .map_err(|e| Error::config("unable to create Kubernetes client", e));
    }

    tracing::info!("Using inferred Kubernetes configuration");

    Client::try_default()
        .await
        .map_err(|e| Error::config("unable to create Kubernetes client", e))
}
