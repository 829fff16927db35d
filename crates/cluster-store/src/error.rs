//! Cluster store errors

use thiserror::Error;

/// Errors that can occur when reading or writing cluster resources.
///
/// `NotFound` and `AlreadyExists` are part of the reconcile contract and are
/// matched on by the reconciler; everything else is a transient API failure
/// the dispatcher retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        /// Object kind
        kind: &'static str,
        /// Object namespace
        namespace: String,
        /// Object name
        name: String,
    },

    /// An object with the same key already exists
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        /// Object kind
        kind: &'static str,
        /// Object namespace
        namespace: String,
        /// Object name
        name: String,
    },

    /// Kubernetes API error that is neither NotFound nor AlreadyExists
    #[error("Kubernetes API error: {0}")]
    Api(#[source] kube::Error),

    /// Store unreachable (used by the mock for failure injection)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True for the benign not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for a duplicate-create conflict.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
