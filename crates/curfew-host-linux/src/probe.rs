//! Reachability probing
//!
//! After the switch applies a transition, the daemon probes a well-known
//! URL to log whether the network actually followed. Observability only:
//! the result never feeds back into switch state.

use curfew_host_api::{HostError, HostResult};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Configuration for the reachability probe
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// URL to check for network reachability
    pub url: String,
    /// Timeout for the whole check
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: "http://connectivitycheck.gstatic.com/generate_204".into(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// HTTP reachability probe
pub struct ReachabilityProbe {
    client: Client,
    config: ProbeConfig,
}

impl ReachabilityProbe {
    pub fn new(config: ProbeConfig) -> HostResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| HostError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Whether the configured URL currently answers. Any 2xx or a bare 204
    /// counts as reachable; transport errors and timeouts do not.
    pub async fn is_reachable(&self) -> bool {
        debug!(url = %self.config.url, "Probing reachability");

        match self.client.get(&self.config.url).send().await {
            Ok(response) => {
                let status = response.status();
                let reachable = status.is_success() || status.as_u16() == 204;
                debug!(url = %self.config.url, status = %status, reachable, "Probe complete");
                reachable
            }
            Err(e) => {
                debug!(url = %self.config.url, error = %e, "Probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_generate_204() {
        let config = ProbeConfig::default();
        assert!(config.url.ends_with("/generate_204"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn probe_builds_from_default_config() {
        let probe = ReachabilityProbe::new(ProbeConfig::default()).unwrap();
        assert_eq!(probe.url(), "http://connectivitycheck.gstatic.com/generate_204");
    }
}
