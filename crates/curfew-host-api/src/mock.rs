//! Mock adapter set for testing

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{AdapterHandle, AdapterSet, HostError, HostResult};

/// The operation a mock call performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterOp {
    Enable,
    Disable,
}

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterCall {
    pub op: AdapterOp,
    pub adapter: String,
}

/// Mock adapter set for unit/integration testing.
///
/// Records every enable/disable call and can be told to fail specific
/// adapters by name.
pub struct MockAdapterSet {
    adapters: Vec<AdapterHandle>,
    calls: Arc<Mutex<Vec<AdapterCall>>>,
    enable_failures: Arc<Mutex<HashSet<String>>>,
    disable_failures: Arc<Mutex<HashSet<String>>>,
}

impl MockAdapterSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let adapters = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| AdapterHandle::new(i as u32 + 1, name))
            .collect();

        Self {
            adapters,
            calls: Arc::new(Mutex::new(Vec::new())),
            enable_failures: Arc::new(Mutex::new(HashSet::new())),
            disable_failures: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Make `enable` fail for the named adapter.
    pub fn fail_enable(&self, name: &str) {
        self.enable_failures.lock().unwrap().insert(name.to_string());
    }

    /// Make `disable` fail for the named adapter.
    pub fn fail_disable(&self, name: &str) {
        self.disable_failures.lock().unwrap().insert(name.to_string());
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn enable_count(&self) -> usize {
        self.count(AdapterOp::Enable)
    }

    pub fn disable_count(&self) -> usize {
        self.count(AdapterOp::Disable)
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn count(&self, op: AdapterOp) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.op == op)
            .count()
    }

    fn record(&self, op: AdapterOp, adapter: &AdapterHandle) {
        self.calls.lock().unwrap().push(AdapterCall {
            op,
            adapter: adapter.name().to_string(),
        });
    }
}

#[async_trait]
impl AdapterSet for MockAdapterSet {
    fn list(&self) -> &[AdapterHandle] {
        &self.adapters
    }

    async fn enable(&self, adapter: &AdapterHandle) -> HostResult<()> {
        self.record(AdapterOp::Enable, adapter);

        if self.enable_failures.lock().unwrap().contains(adapter.name()) {
            return Err(HostError::Internal(format!(
                "mock enable failure for {}",
                adapter.name()
            )));
        }
        Ok(())
    }

    async fn disable(&self, adapter: &AdapterHandle) -> HostResult<()> {
        self.record(AdapterOp::Disable, adapter);

        if self.disable_failures.lock().unwrap().contains(adapter.name()) {
            return Err(HostError::Internal(format!(
                "mock disable failure for {}",
                adapter.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let set = MockAdapterSet::new(["eth0", "wlan0"]);

        let _ = set.disable_all().await;
        let _ = set.enable_all().await;

        let calls = set.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].op, AdapterOp::Disable);
        assert_eq!(calls[0].adapter, "eth0");
        assert_eq!(calls[1].adapter, "wlan0");
        assert_eq!(calls[2].op, AdapterOp::Enable);
    }

    #[tokio::test]
    async fn failure_injection_is_per_adapter() {
        let set = MockAdapterSet::new(["eth0", "wlan0"]);
        set.fail_enable("eth0");

        let failures = set.enable_all().await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].adapter.name(), "eth0");
        assert!(set.disable_all().await.is_empty());
    }

    #[tokio::test]
    async fn handles_are_indexed_from_one() {
        let set = MockAdapterSet::new(["eth0", "wlan0"]);

        assert_eq!(set.list()[0].index(), 1);
        assert_eq!(set.list()[1].index(), 2);
    }
}
