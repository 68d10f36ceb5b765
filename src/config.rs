//! Resolver configuration.

/// Configuration for Kubernetes peer endpoint resolution.
///
/// Captured once when the [`ConnectionManager`](crate::ConnectionManager) is
/// constructed and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    url: Option<String>,
    namespace: String,
    enabled: bool,
}

impl ResolverConfig {
    /// Creates an enabled configuration that auto-detects the cluster
    /// connection and queries the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            url: None,
            namespace: namespace.into(),
            enabled: true,
        }
    }

    /// Pins the control-plane API server URL, e.g. a port-forwarded
    /// endpoint used for local testing. An empty URL means auto-detect.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// Sets the master switch. When disabled no client is ever built and
    /// every resolution returns an empty list.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The explicit API server URL, if one was configured.
    #[must_use]
    pub fn control_plane_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The namespace endpoints are looked up in.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether resolution is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_enabled_and_auto_detects() {
        let config = ResolverConfig::new("grid");

        assert_eq!(config.namespace(), "grid");
        assert!(config.is_enabled());
        assert!(config.control_plane_url().is_none());
    }

    #[test]
    fn url_pins_control_plane() {
        let config = ResolverConfig::new("grid").url("http://localhost:8000/");
        assert_eq!(config.control_plane_url(), Some("http://localhost:8000/"));
    }

    #[test]
    fn empty_url_means_auto_detect() {
        let config = ResolverConfig::new("grid")
            .url("http://localhost:8000/")
            .url("");

        assert!(config.control_plane_url().is_none());
    }

    #[test]
    fn enabled_toggles_master_switch() {
        let config = ResolverConfig::new("grid").enabled(false);

        assert!(!config.is_enabled());
        assert_eq!(config.namespace(), "grid");
    }
}
