//! Host adapter traits

use async_trait::async_trait;
use thiserror::Error;

use crate::AdapterHandle;

/// Errors from host adapter operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Netlink error: {0}")]
    Netlink(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// One adapter that could not be toggled during an `enable_all` or
/// `disable_all` pass.
#[derive(Debug)]
pub struct AdapterFailure {
    pub adapter: AdapterHandle,
    pub error: HostError,
}

/// The network capability injected into the curfew engine.
///
/// The adapter list is captured once at startup and treated as read-only
/// afterwards; an empty list is valid and makes every pass a no-op.
#[async_trait]
pub trait AdapterSet: Send + Sync {
    /// The adapters this set operates on.
    fn list(&self) -> &[AdapterHandle];

    /// Bring one adapter up.
    async fn enable(&self, adapter: &AdapterHandle) -> HostResult<()>;

    /// Take one adapter down.
    async fn disable(&self, adapter: &AdapterHandle) -> HostResult<()>;

    /// Enable every adapter, attempting each independently. A failure on
    /// one adapter never aborts the remaining adapters; all failures are
    /// collected for the caller to report.
    async fn enable_all(&self) -> Vec<AdapterFailure> {
        let mut failures = Vec::new();
        for adapter in self.list() {
            if let Err(error) = self.enable(adapter).await {
                failures.push(AdapterFailure {
                    adapter: adapter.clone(),
                    error,
                });
            }
        }
        failures
    }

    /// Disable every adapter, attempting each independently.
    async fn disable_all(&self) -> Vec<AdapterFailure> {
        let mut failures = Vec::new();
        for adapter in self.list() {
            if let Err(error) = self.disable(adapter).await {
                failures.push(AdapterFailure {
                    adapter: adapter.clone(),
                    error,
                });
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockAdapterSet;

    #[tokio::test]
    async fn empty_set_is_a_noop() {
        let set = MockAdapterSet::new(Vec::<String>::new());

        assert!(set.list().is_empty());
        assert!(set.enable_all().await.is_empty());
        assert!(set.disable_all().await.is_empty());
        assert!(set.calls().is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_pass() {
        let set = MockAdapterSet::new(["eth0", "wlan0", "usb0"]);
        set.fail_disable("wlan0");

        let failures = set.disable_all().await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].adapter.name(), "wlan0");
        // All three adapters were still attempted
        assert_eq!(set.disable_count(), 3);
    }
}
