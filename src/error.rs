//! Error type for endpoint resolution.

use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the resolver.
///
/// A disabled or shut down resolver and a missing endpoints object are not
/// errors; both resolve to an empty address list.
#[derive(Error, Debug)]
pub enum Error {
    /// The control-plane client could not be built during initialization.
    #[error("Kubernetes client configuration failed: {message}")]
    Config {
        /// What was being configured.
        message: String,
        /// The underlying configuration error.
        #[source]
        source: BoxError,
    },

    /// The endpoints query failed in transport or was rejected by the API server.
    #[error("Kubernetes endpoints query failed: {0}")]
    Transport(#[from] kube::Error),

    /// A bounded resolution did not complete in time.
    #[error("Kubernetes endpoints query timed out after {0:?}")]
    Timeout(Duration),
}

/// Boxed source of a configuration failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

impl Error {
    pub(crate) fn config(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Config {
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;
