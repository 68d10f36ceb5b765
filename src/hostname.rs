//! Deployment name derivation from the pod hostname.
//!
//! Kubernetes names pods `<deployment>-<suffix>`, and the suffix may itself
//! contain dashes. The deployment name is everything before the first dash.
//! A deployment whose own name contains a dash is truncated at that dash;
//! this is a known limitation of the convention.

use std::env;

/// Environment variable holding the pod hostname.
pub const HOSTNAME_VAR: &str = "HOSTNAME";

const FALLBACK_HOSTNAME: &str = "localhost";

/// Derives this instance's deployment name from the `HOSTNAME` environment
/// variable, falling back to `"localhost"` when it is unset.
///
/// The variable is read on every call.
#[must_use]
pub fn deployment_name() -> String {
    let hostname = hostname();
    derive(hostname.as_deref()).to_string()
}

pub(crate) fn hostname() -> Option<String> {
    env::var(HOSTNAME_VAR).ok()
}

/// Deployment name for an optional hostname, using `"localhost"` when absent.
pub(crate) fn derive(hostname: Option<&str>) -> &str {
    deployment_name_from(hostname.unwrap_or(FALLBACK_HOSTNAME))
}

/// Returns the part of `hostname` before the first dash, or the whole
/// hostname when it has none.
#[must_use]
pub fn deployment_name_from(hostname: &str) -> &str {
    hostname
        .split_once('-')
        .map_or(hostname, |(deployment, _)| deployment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_generated_suffix() {
        assert_eq!(deployment_name_from("ledger-7f8b9c-x2z"), "ledger");
    }

    #[test]
    fn single_dash() {
        assert_eq!(deployment_name_from("grid-0"), "grid");
    }

    #[test]
    fn no_dash_returns_hostname() {
        assert_eq!(deployment_name_from("standalone"), "standalone");
    }

    #[test]
    fn dashed_deployment_is_truncated() {
        // Known limitation: "order-service-5d9f-abcde" is deployment "order-service".
        assert_eq!(deployment_name_from("order-service-5d9f-abcde"), "order");
    }

    #[test]
    fn leading_dash_yields_empty_name() {
        assert_eq!(deployment_name_from("-abc"), "");
    }

    #[test]
    fn empty_hostname() {
        assert_eq!(deployment_name_from(""), "");
    }

    #[test]
    fn missing_hostname_falls_back_to_localhost() {
        assert_eq!(derive(None), "localhost");
    }

    #[test]
    fn present_hostname_is_derived() {
        assert_eq!(derive(Some("grid-6c4f7d-q8x")), "grid");
    }

    #[test]
    fn deployment_name_matches_environment() {
        let hostname = hostname();
        let expected = derive(hostname.as_deref()).to_string();

        assert_eq!(deployment_name(), expected);
    }
}
