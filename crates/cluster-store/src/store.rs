//! ClusterStore trait for mocking
//!
//! This trait abstracts the Kubernetes API to enable mocking in unit tests.
//! The concrete `KubeStore` implements it against a live cluster, and tests
//! use the in-memory `MockClusterStore`.

use crate::error::StoreError;
use crds::Workspace;
use k8s_openapi::api::core::v1::Pod;

/// Trait for the cluster resource operations the controller consumes
///
/// Keys are `(namespace, name)` pairs; namespace scoping is mandatory.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetch a Workspace by key.
    async fn get_workspace(&self, namespace: &str, name: &str) -> Result<Workspace, StoreError>;

    /// Fetch a Pod by key.
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError>;

    /// Create a Pod. A duplicate create surfaces as
    /// [`StoreError::AlreadyExists`].
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, StoreError>;
}
