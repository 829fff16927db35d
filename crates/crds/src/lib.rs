//! Workspace operator CRD definitions
//!
//! Kubernetes Custom Resource Definitions for the workspace controller.

pub mod workspace;

pub use workspace::*;
