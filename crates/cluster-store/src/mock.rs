//! Mock ClusterStore for unit testing
//!
//! Stores Workspaces and Pods in memory and can be configured to return
//! specific failures, so reconcile behavior can be tested without a running
//! cluster.

use crate::error::StoreError;
use crate::store::ClusterStore;
use crds::Workspace;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ObjectMeta;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock ClusterStore for testing
///
/// Counts mutating calls and supports failure injection for the error paths
/// the reconciler has to handle (unavailable store, duplicate create).
#[derive(Clone, Default)]
pub struct MockClusterStore {
    workspaces: Arc<Mutex<HashMap<(String, String), Workspace>>>,
    pods: Arc<Mutex<HashMap<(String, String), Pod>>>,
    // Number of create_pod calls, including failed ones
    pod_create_calls: Arc<Mutex<u64>>,
    fail_workspace_reads: Arc<Mutex<bool>>,
    fail_pod_reads: Arc<Mutex<bool>>,
    fail_pod_creates: Arc<Mutex<bool>>,
    conflict_on_pod_create: Arc<Mutex<bool>>,
}

impl std::fmt::Debug for MockClusterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClusterStore").finish_non_exhaustive()
    }
}

fn key(meta: &ObjectMeta) -> (String, String) {
    (
        meta.namespace.clone().unwrap_or_else(|| "default".to_string()),
        meta.name.clone().unwrap_or_default(),
    )
}

impl MockClusterStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Workspace to the mock store (for test setup)
    pub fn add_workspace(&self, workspace: Workspace) {
        self.workspaces
            .lock()
            .unwrap()
            .insert(key(&workspace.metadata), workspace);
    }

    /// Add a Pod to the mock store (for test setup)
    pub fn add_pod(&self, pod: Pod) {
        self.pods.lock().unwrap().insert(key(&pod.metadata), pod);
    }

    /// Fetch a stored Pod by key (for assertions)
    pub fn pod(&self, namespace: &str, name: &str) -> Option<Pod> {
        self.pods
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Number of Pods currently in the store
    pub fn pod_count(&self) -> usize {
        self.pods.lock().unwrap().len()
    }

    /// Number of create_pod calls made, including failed ones
    pub fn pod_create_calls(&self) -> u64 {
        *self.pod_create_calls.lock().unwrap()
    }

    /// Make subsequent Workspace reads fail with `Unavailable`
    pub fn fail_workspace_reads(&self) {
        *self.fail_workspace_reads.lock().unwrap() = true;
    }

    /// Make subsequent Pod reads fail with `Unavailable`
    pub fn fail_pod_reads(&self) {
        *self.fail_pod_reads.lock().unwrap() = true;
    }

    /// Make subsequent Pod creates fail with `Unavailable`
    pub fn fail_pod_creates(&self) {
        *self.fail_pod_creates.lock().unwrap() = true;
    }

    /// Make subsequent Pod creates fail with `AlreadyExists`, simulating a
    /// concurrent creator winning the race
    pub fn conflict_on_pod_create(&self) {
        *self.conflict_on_pod_create.lock().unwrap() = true;
    }
}

#[async_trait::async_trait]
impl ClusterStore for MockClusterStore {
    async fn get_workspace(&self, namespace: &str, name: &str) -> Result<Workspace, StoreError> {
        if *self.fail_workspace_reads.lock().unwrap() {
            return Err(StoreError::Unavailable(
                "injected Workspace read failure".to_string(),
            ));
        }
        self.workspaces
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "Workspace",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError> {
        if *self.fail_pod_reads.lock().unwrap() {
            return Err(StoreError::Unavailable(
                "injected Pod read failure".to_string(),
            ));
        }
        self.pods
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "Pod",
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, StoreError> {
        *self.pod_create_calls.lock().unwrap() += 1;

        let name = pod.metadata.name.clone().unwrap_or_default();
        if *self.fail_pod_creates.lock().unwrap() {
            return Err(StoreError::Unavailable(
                "injected Pod create failure".to_string(),
            ));
        }
        let exists = self
            .pods
            .lock()
            .unwrap()
            .contains_key(&(namespace.to_string(), name.clone()));
        if exists || *self.conflict_on_pod_create.lock().unwrap() {
            return Err(StoreError::AlreadyExists {
                kind: "Pod",
                namespace: namespace.to_string(),
                name,
            });
        }
        self.pods
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name), pod.clone());
        Ok(pod.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(namespace: &str, name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_pod_not_found_when_empty() {
        let store = MockClusterStore::new();
        let err = store.get_pod("dev", "ws1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_already_exists() {
        let store = MockClusterStore::new();
        store.create_pod("dev", &pod("dev", "ws1")).await.unwrap();
        let err = store.create_pod("dev", &pod("dev", "ws1")).await.unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.pod_create_calls(), 2);
        assert_eq!(store.pod_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection_on_reads() {
        let store = MockClusterStore::new();
        store.fail_pod_reads();
        let err = store.get_pod("dev", "ws1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
