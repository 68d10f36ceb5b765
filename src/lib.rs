#![deny(missing_docs)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Kubernetes peer endpoint resolution for self-organizing clustered services.
//!
//! A clustered application (for example an in-memory data grid) running as a
//! Kubernetes deployment needs the addresses of its peers to form a cluster.
//! This crate derives the deployment name from the pod's own hostname and
//! reads the matching core/v1 `Endpoints` object, returning ready addresses
//! followed by not-ready ones.
//!
//! # Features
//!
//! - **Self-discovery**: Deployment name derived from the `HOSTNAME` pod name
//! - **Point-in-time reads**: One `Endpoints` query per call, no watch or cache
//! - **Graceful degradation**: Disabled, shut down and unknown services
//!   resolve to an empty list
//! - **Explicit failures**: Query errors are returned, not swallowed
//!
//! # Usage
//!
//! ```ignore
//! use kube_peer_endpoints::{EndpointResolver, ResolverConfig};
//!
//! let resolver = EndpointResolver::from_config(ResolverConfig::new("my-namespace"));
//! resolver.initialize().await?;
//!
//! // Peers of this pod's own deployment
//! let peers = resolver.find_own_endpoints().await?;
//!
//! // Or any service in the namespace
//! let others = resolver.find_endpoints("other-service").await?;
//!
//! resolver.shutdown();
//! ```
//!
//! For local testing against `kubectl proxy`, pin the API server URL:
//!
//! ```ignore
//! let config = ResolverConfig::new("my-namespace").url("http://localhost:8001");
//! ```

mod config;
mod connection;
mod error;
pub mod hostname;
mod resolver;

pub use config::ResolverConfig;
pub use connection::{ConnectionManager, EndpointsSource};
pub use error::{BoxError, Error, Result};
pub use resolver::EndpointResolver;
