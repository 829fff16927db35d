//! Kubernetes-backed ClusterStore implementation

use crate::error::StoreError;
use crate::store::ClusterStore;
use crds::Workspace;
use k8s_openapi::api::core::v1::Pod;
use kube::api::PostParams;
use kube::{Api, Client};
use tracing::debug;

/// Production store backed by a shared `kube::Client`.
///
/// The client is injected at construction; nothing here is global state.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    /// Create a store around an existing Kubernetes client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Map a kube API error to the store taxonomy by HTTP status code.
fn classify(err: kube::Error, kind: &'static str, namespace: &str, name: &str) -> StoreError {
    match err {
        kube::Error::Api(ref resp) if resp.code == 404 => StoreError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(ref resp) if resp.code == 409 => StoreError::AlreadyExists {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        other => StoreError::Api(other),
    }
}

#[async_trait::async_trait]
impl ClusterStore for KubeStore {
    async fn get_workspace(&self, namespace: &str, name: &str) -> Result<Workspace, StoreError> {
        debug!("Getting Workspace {}/{}", namespace, name);
        let api: Api<Workspace> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| classify(e, "Workspace", namespace, name))
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, StoreError> {
        debug!("Getting Pod {}/{}", namespace, name);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| classify(e, "Pod", namespace, name))
    }

    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, StoreError> {
        let name = pod.metadata.name.clone().unwrap_or_default();
        debug!("Creating Pod {}/{}", namespace, name);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), pod)
            .await
            .map_err(|e| classify(e, "Pod", namespace, &name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "test".to_string(),
            reason: "test".to_string(),
            code,
        })
    }

    #[test]
    fn test_classify_404_as_not_found() {
        let err = classify(api_error(404), "Pod", "dev", "ws1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classify_409_as_already_exists() {
        let err = classify(api_error(409), "Pod", "dev", "ws1");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_classify_other_codes_as_api_error() {
        let err = classify(api_error(503), "Pod", "dev", "ws1");
        assert!(matches!(err, StoreError::Api(_)));
    }
}
