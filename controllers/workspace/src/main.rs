//! Workspace Controller
//!
//! Reconciles `Workspace` CRDs into development-environment pods: an init
//! step clones the declared git repository into a shared working directory
//! and a main step serves it with the declared IDE image.
//!
//! The loop is level-triggered; each invocation re-reads the current state
//! and issues at most the corrective actions needed to converge it.

mod backoff;
mod controller;
mod error;
mod owner;
mod pod;
mod reconciler;
mod watcher;

#[cfg(test)]
mod test_utils;

use crate::error::ControllerError;
use controller::Controller;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Workspace Controller");

    // Load configuration from environment variables
    let namespace = env::var("WATCH_NAMESPACE").ok();

    info!("Configuration:");
    info!(
        "  Namespace: {}",
        namespace.as_deref().unwrap_or("default")
    );

    // Initialize and run controller
    let controller = Controller::new(namespace).await?;
    controller.run().await?;

    Ok(())
}
