//! Controller owner references for Workspace children.
//!
//! Every synthesized child carries a controller owner reference back to its
//! Workspace, so the cluster garbage collector cascades deletion when the
//! owner goes away. The controller itself never deletes children.

use crate::error::ControllerError;
use crds::Workspace;
use k8s_openapi::api::core::v1::Pod;
use kube::Resource;

/// Stamp `pod` with a controller owner reference pointing at `workspace`.
///
/// Fails only when the owner's metadata cannot yield a reference (missing
/// name or uid). That is a configuration problem, not a transient one, so
/// the error is fatal and must not be retried.
pub fn link_controller_owner(workspace: &Workspace, pod: &mut Pod) -> Result<(), ControllerError> {
    let owner_ref = workspace.controller_owner_ref(&()).ok_or_else(|| {
        ControllerError::OwnerReference(format!(
            "Workspace {}/{} has no name or uid to reference",
            workspace.meta().namespace.as_deref().unwrap_or("default"),
            workspace.meta().name.as_deref().unwrap_or("<unknown>"),
        ))
    })?;

    pod.metadata
        .owner_references
        .get_or_insert_with(Vec::new)
        .push(owner_ref);
    Ok(())
}
