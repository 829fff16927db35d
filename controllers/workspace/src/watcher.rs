//! Kubernetes resource watchers.
//!
//! This module watches Workspace resources for changes, delivers each event
//! to the reconciler, and interprets the returned `ReconcileResult`:
//! requested requeues run immediately (or after the requested delay), and
//! transient failures are retried with Fibonacci backoff. Fatal errors are
//! logged once and never retried.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use cluster_store::ClusterStore;
use crds::Workspace;
use futures::TryStreamExt;
use kube::Api;
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Deliveries per watch event before giving up until the next event.
/// Level-triggering converges the key on a later event or resync anyway.
const MAX_ATTEMPTS: u32 = 5;

/// Watches Workspace resources and dispatches reconciles.
pub struct Watcher<S> {
    reconciler: Arc<Reconciler<S>>,
    workspace_api: Api<Workspace>,
}

impl<S: ClusterStore> Watcher<S> {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler<S>>, workspace_api: Api<Workspace>) -> Self {
        Self {
            reconciler,
            workspace_api,
        }
    }

    /// Starts watching Workspace resources.
    pub async fn watch_workspaces(&self) -> Result<(), ControllerError> {
        info!("Starting Workspace watcher");

        let mut stream = Box::pin(watcher(
            self.workspace_api.clone(),
            watcher::Config::default(),
        ));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(workspace) => {
                    info!("Workspace applied: {}", display_name(&workspace));
                    self.deliver(&workspace).await;
                }
                watcher::Event::Delete(workspace) => {
                    // Pod cleanup cascades through the owner reference.
                    info!("Workspace deleted: {}", display_name(&workspace));
                }
                watcher::Event::Init => {
                    info!("Workspace watcher initialized");
                }
                watcher::Event::InitApply(workspace) => {
                    debug!("Workspace init apply: {}", display_name(&workspace));
                    self.deliver(&workspace).await;
                }
                watcher::Event::InitDone => {
                    info!("Workspace watcher initialization complete");
                }
            }
        }

        Ok(())
    }

    /// Run reconcile for one watch event, honoring requeue requests and
    /// retrying transient failures with backoff.
    async fn deliver(&self, workspace: &Workspace) {
        let Some(name) = workspace.metadata.name.as_deref() else {
            warn!("Ignoring Workspace without a name");
            return;
        };
        let namespace = workspace.metadata.namespace.as_deref().unwrap_or("default");

        let mut backoff = FibonacciBackoff::new(1, 30);
        for _ in 0..MAX_ATTEMPTS {
            match self.reconciler.reconcile(namespace, name).await {
                Ok(result) if result.requeue => {
                    backoff.reset();
                    if let Some(delay) = result.requeue_after {
                        tokio::time::sleep(delay).await;
                    }
                }
                Ok(_) => return,
                Err(e) if e.is_fatal() => {
                    error!("Giving up on Workspace {}/{}: {}", namespace, name, e);
                    return;
                }
                Err(e) => {
                    let delay = backoff.next_backoff();
                    warn!(
                        "Failed to reconcile Workspace {}/{} (retrying in {:?}): {}",
                        namespace, name, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
        warn!(
            "Workspace {}/{} did not converge after {} attempts; waiting for the next event",
            namespace, name, MAX_ATTEMPTS
        );
    }
}

fn display_name(workspace: &Workspace) -> &str {
    workspace.metadata.name.as_deref().unwrap_or("<unknown>")
}
