//! Workspace CRD
//!
//! A Workspace describes a development environment: a git repository cloned
//! into a shared working directory and an IDE image serving it on port 8080.
//! The controller realizes a Workspace as a single Pod with the same
//! namespace/name.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "workspaces.microscaler.io",
    version = "v1alpha1",
    kind = "Workspace",
    namespaced,
    status = "WorkspaceStatus",
    shortname = "ws"
)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSpec {
    /// Git repository cloned into the workspace
    pub repo: Repo,

    /// IDE container image run against the cloned repository
    pub image: String,

    /// CPU/memory requests and limits, copied verbatim onto the workspace container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<WorkspaceResources>,
}

/// Identifies the git source to clone into the workspace.
///
/// The spec is the sole source of desired state; the controller only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    /// Directory name the repository is cloned into (under /workspace)
    pub name: String,

    /// Full URL of the git repository
    pub url: String,

    /// Base ref to check out (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ref: Option<String>,
}

/// Compute resources for the workspace container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResources {
    /// Requested resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceSpec>,

    /// Resource limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceSpec>,
}

/// A cpu/memory quantity pair, using Kubernetes quantity strings
/// ("500m", "1Gi").
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// CPU quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    /// Memory quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// Observed state of a Workspace.
///
/// Reserved: the current reconcile path does not write status yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    /// Lifecycle phase
    #[serde(default)]
    pub phase: WorkspacePhase,

    /// Last reconciliation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,

    /// Error message if reconciliation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Workspace lifecycle phase
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum WorkspacePhase {
    /// Workspace pod not created yet
    #[default]
    Pending,

    /// Workspace pod exists
    Running,

    /// Reconciliation failed
    Failed,
}
