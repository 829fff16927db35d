//! Typed Kubernetes resource store
//!
//! The workspace controller talks to the cluster exclusively through the
//! [`ClusterStore`] trait: get a Workspace, get a Pod, create a Pod, all by
//! `(namespace, name)`. The trait is the injection seam that keeps the
//! reconciler free of ambient global clients and makes it unit-testable.
//!
//! Two implementations are provided:
//! - [`KubeStore`] - backed by a `kube::Client`, used in production
//! - [`MockClusterStore`] - in-memory, used in unit tests

pub mod client;
pub mod error;
pub mod mock;
pub mod store;

pub use client::KubeStore;
pub use error::StoreError;
pub use mock::MockClusterStore;
pub use store::ClusterStore;
