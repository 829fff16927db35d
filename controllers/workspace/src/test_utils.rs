//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test
//! scenarios.

use crds::{Repo, ResourceSpec, Workspace, WorkspaceResources, WorkspaceSpec};
use kube::api::ObjectMeta;

/// Helper to create a test Workspace, with the uid the API server would set
pub fn create_test_workspace(name: &str, namespace: &str) -> Workspace {
    Workspace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("uid-{name}")),
            ..Default::default()
        },
        spec: WorkspaceSpec {
            repo: Repo {
                name: "app".to_string(),
                url: "https://example.git".to_string(),
                base_ref: None,
            },
            image: "img:latest".to_string(),
            resources: None,
        },
        status: None,
    }
}

/// Helper to create a test Workspace with cpu/memory requests and limits
pub fn create_test_workspace_with_resources(name: &str, namespace: &str) -> Workspace {
    let mut workspace = create_test_workspace(name, namespace);
    workspace.spec.resources = Some(WorkspaceResources {
        requests: Some(ResourceSpec {
            cpu: Some("500m".to_string()),
            memory: Some("1Gi".to_string()),
        }),
        limits: Some(ResourceSpec {
            cpu: Some("1".to_string()),
            memory: Some("2Gi".to_string()),
        }),
    });
    workspace
}
