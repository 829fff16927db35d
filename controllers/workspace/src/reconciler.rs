//! Reconciliation logic for Workspace CRDs.
//!
//! One invocation per `(namespace, name)` key: load the Workspace, inspect
//! the child Pod, and issue at most the mutations needed to converge them.
//! All state lives in the store; the reconciler keeps nothing between
//! invocations and is safe to restart at any point.

use crate::error::ControllerError;
use crate::owner::link_controller_owner;
use crate::pod::{desired_pod, pod_drifted};
use cluster_store::ClusterStore;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of one reconcile invocation, interpreted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileResult {
    /// Re-invoke reconcile for the same key
    pub requeue: bool,

    /// Delay before the re-invocation
    pub requeue_after: Option<Duration>,
}

impl ReconcileResult {
    /// Converged; nothing to do until the next watch event.
    pub fn done() -> Self {
        Self::default()
    }

    /// Request an immediate follow-up reconcile.
    pub fn requeue() -> Self {
        Self {
            requeue: true,
            requeue_after: None,
        }
    }

    /// Request a follow-up reconcile after a delay.
    #[allow(dead_code)] // Reserved for future use
    pub fn requeue_after(delay: Duration) -> Self {
        Self {
            requeue: true,
            requeue_after: Some(delay),
        }
    }
}

/// Reconciles Workspace resources against the cluster store.
///
/// The store is an injected capability; the reconciler performs no other
/// I/O and holds no locks.
pub struct Reconciler<S> {
    store: S,
}

impl<S> std::fmt::Debug for Reconciler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl<S: ClusterStore> Reconciler<S> {
    /// Creates a new reconciler around a store capability.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Converge one Workspace key toward its declared state.
    ///
    /// Level-triggered: only the current snapshot matters, never the event
    /// that caused the invocation. Re-running on an unchanged cluster
    /// performs zero mutations once the child exists.
    pub async fn reconcile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileResult, ControllerError> {
        info!("Reconciling Workspace {}/{}", namespace, name);

        let workspace = match self.store.get_workspace(namespace, name).await {
            Ok(workspace) => workspace,
            Err(e) if e.is_not_found() => {
                // Deleted between enqueue and processing
                info!("Workspace {}/{} not found. Ignoring...", namespace, name);
                return Ok(ReconcileResult::done());
            }
            Err(e) => {
                error!("Failed to get Workspace {}/{}: {}", namespace, name, e);
                return Err(ControllerError::Store(e));
            }
        };

        if workspace.metadata.deletion_timestamp.is_some() {
            // No finalizer protocol yet; child cleanup rides on the owner
            // reference and the cluster garbage collector.
            info!("Workspace {}/{} is marked for deletion.", namespace, name);
            return Ok(ReconcileResult::done());
        }

        let observed = match self.store.get_pod(namespace, name).await {
            Ok(pod) => Some(pod),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                error!("Failed to get Pod {}/{}: {}", namespace, name, e);
                return Err(ControllerError::Store(e));
            }
        };

        match observed {
            Some(observed) => {
                // Existence is the convergence check; divergence is reported
                // but not corrected in place.
                if pod_drifted(&desired_pod(&workspace), &observed) {
                    warn!(
                        "Pod {}/{} no longer matches its Workspace spec; leaving it in place",
                        namespace, name
                    );
                } else {
                    debug!("Pod {}/{} matches its Workspace spec", namespace, name);
                }
                Ok(ReconcileResult::done())
            }
            None => {
                let mut pod = desired_pod(&workspace);
                link_controller_owner(&workspace, &mut pod)?;

                info!("Creating Pod for Workspace {}/{}", namespace, name);
                match self.store.create_pod(namespace, &pod).await {
                    // Requeue to re-observe the now-created child
                    Ok(_) => Ok(ReconcileResult::requeue()),
                    Err(e) if e.is_already_exists() => {
                        // A concurrent reconcile or resync won the race; the
                        // pod is there either way.
                        debug!(
                            "Pod {}/{} already exists; treating create as a no-op",
                            namespace, name
                        );
                        Ok(ReconcileResult::requeue())
                    }
                    Err(e) => {
                        error!("Could not create Pod {}/{}: {}", namespace, name, e);
                        Err(ControllerError::Store(e))
                    }
                }
            }
        }
    }
}
