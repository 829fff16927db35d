//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the Kubernetes
//! client, the store capability, the reconciler and the Workspace watcher
//! together, then runs until the watcher exits.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use cluster_store::KubeStore;
use crds::Workspace;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for Workspace management.
pub struct Controller {
    workspace_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(namespace: Option<String>) -> Result<Self, ControllerError> {
        info!("Initializing Workspace Controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        let ns = namespace.as_deref().unwrap_or("default");
        let workspace_api: Api<Workspace> = Api::namespaced(kube_client.clone(), ns);

        // The store is the one injected capability the reconciler consumes;
        // there is no ambient global client.
        let store = KubeStore::new(kube_client);
        let reconciler = Arc::new(Reconciler::new(store));

        // Start the watcher in a background task
        let watcher_instance = Watcher::new(reconciler, workspace_api);
        let workspace_watcher =
            tokio::spawn(async move { watcher_instance.watch_workspaces().await });

        Ok(Self { workspace_watcher })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Workspace Controller running");

        // Wait for the watcher to exit (it should run forever)
        (&mut self.workspace_watcher)
            .await
            .map_err(|e| ControllerError::Watch(format!("Workspace watcher panicked: {}", e)))?
            .map_err(|e| ControllerError::Watch(format!("Workspace watcher error: {}", e)))?;

        Ok(())
    }
}
