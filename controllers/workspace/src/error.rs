//! Controller-specific error types.
//!
//! This module defines error types specific to the Workspace Controller
//! that are not covered by upstream library errors.

use cluster_store::StoreError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Workspace Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes client error during bootstrap
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Resource store error (read or create against the cluster)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Owner reference could not be resolved from the owner's metadata
    #[error("Owner reference resolution failed: {0}")]
    OwnerReference(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    #[allow(dead_code)] // Reserved for future use
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// Fatal errors indicate misconfiguration rather than a transient fault;
    /// the dispatcher must not retry them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OwnerReference(_) | Self::InvalidConfig(_))
    }
}
