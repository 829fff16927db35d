//! Desired-state synthesis for Workspace pods.
//!
//! `desired_pod` is a pure function of the Workspace spec: no I/O, no
//! randomness, no timestamps. Identical specs yield byte-identical pods,
//! which is what makes drift diffing meaningful.

use crds::{ResourceSpec, Workspace, WorkspaceResources};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EmptyDirVolumeSource, Pod, PodSpec, ResourceRequirements, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Shared working directory mounted into both containers.
pub const WORKSPACE_DIR: &str = "/workspace";

/// Name of the init container that clones the repository.
pub const CLONE_CONTAINER: &str = "clonerefs";

/// Name of the main IDE container.
pub const WORKSPACE_CONTAINER: &str = "workspace";

const WORKDIR_VOLUME: &str = "workdir";
const CLONE_IMAGE: &str = "alpine/git:latest";
const IDE_PORT: i32 = 8080;
const IDE_PORT_NAME: &str = "ide";

/// Synthesize the child Pod a Workspace must own.
///
/// The pod carries the same namespace/name as its owner (one child per
/// parent, by naming convention). The owner reference is stamped separately
/// by [`crate::owner::link_controller_owner`].
pub fn desired_pod(workspace: &Workspace) -> Pod {
    let repo = &workspace.spec.repo;

    Pod {
        metadata: ObjectMeta {
            name: workspace.metadata.name.clone(),
            namespace: workspace.metadata.namespace.clone(),
            ..Default::default()
        },
        spec: Some(PodSpec {
            init_containers: Some(vec![Container {
                name: CLONE_CONTAINER.to_string(),
                image: Some(CLONE_IMAGE.to_string()),
                working_dir: Some(WORKSPACE_DIR.to_string()),
                args: Some(vec![
                    "clone".to_string(),
                    repo.url.clone(),
                    repo.name.clone(),
                ]),
                volume_mounts: Some(vec![workdir_mount()]),
                ..Default::default()
            }]),
            containers: vec![Container {
                name: WORKSPACE_CONTAINER.to_string(),
                image: Some(workspace.spec.image.clone()),
                args: Some(vec![
                    "--auth".to_string(),
                    "none".to_string(),
                    format!("{WORKSPACE_DIR}/{}", repo.name),
                ]),
                ports: Some(vec![ContainerPort {
                    container_port: IDE_PORT,
                    name: Some(IDE_PORT_NAME.to_string()),
                    ..Default::default()
                }]),
                resources: workspace.spec.resources.as_ref().map(resource_requirements),
                volume_mounts: Some(vec![workdir_mount()]),
                ..Default::default()
            }],
            volumes: Some(vec![Volume {
                name: WORKDIR_VOLUME.to_string(),
                // Scratch space scoped to the pod lifetime
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        status: None,
    }
}

/// True when the observed pod no longer matches what the Workspace spec
/// would synthesize. Compares image, args and resources of the IDE container
/// and the args of the clone step, field by field.
///
/// Detection only: the reconciler reports divergence but does not patch the
/// pod in place.
pub fn pod_drifted(desired: &Pod, observed: &Pod) -> bool {
    match (main_container(desired), main_container(observed)) {
        (Some(want), Some(have)) => {
            if want.image != have.image
                || want.args != have.args
                || want.resources != have.resources
            {
                return true;
            }
        }
        _ => return true,
    }
    match (clone_container(desired), clone_container(observed)) {
        (Some(want), Some(have)) => want.args != have.args,
        _ => true,
    }
}

fn main_container(pod: &Pod) -> Option<&Container> {
    pod.spec
        .as_ref()?
        .containers
        .iter()
        .find(|c| c.name == WORKSPACE_CONTAINER)
}

fn clone_container(pod: &Pod) -> Option<&Container> {
    pod.spec
        .as_ref()?
        .init_containers
        .as_ref()?
        .iter()
        .find(|c| c.name == CLONE_CONTAINER)
}

fn workdir_mount() -> VolumeMount {
    VolumeMount {
        name: WORKDIR_VOLUME.to_string(),
        mount_path: WORKSPACE_DIR.to_string(),
        ..Default::default()
    }
}

fn resource_requirements(resources: &WorkspaceResources) -> ResourceRequirements {
    ResourceRequirements {
        requests: quantity_map(resources.requests.as_ref()),
        limits: quantity_map(resources.limits.as_ref()),
        ..Default::default()
    }
}

// BTreeMap keeps key order stable so synthesis stays deterministic.
fn quantity_map(spec: Option<&ResourceSpec>) -> Option<BTreeMap<String, Quantity>> {
    let spec = spec?;
    let mut map = BTreeMap::new();
    if let Some(cpu) = &spec.cpu {
        map.insert("cpu".to_string(), Quantity(cpu.clone()));
    }
    if let Some(memory) = &spec.memory {
        map.insert("memory".to_string(), Quantity(memory.clone()));
    }
    if map.is_empty() { None } else { Some(map) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_synthesis_is_deterministic() {
        let workspace = create_test_workspace_with_resources("ws1", "dev");
        let first = serde_json::to_vec(&desired_pod(&workspace)).unwrap();
        let second = serde_json::to_vec(&desired_pod(&workspace)).unwrap();
        assert_eq!(first, second, "Identical specs must serialize identically");
    }

    #[test]
    fn test_pod_has_clone_and_ide_steps() {
        let workspace = create_test_workspace("ws1", "dev");
        let pod = desired_pod(&workspace);

        assert_eq!(pod.metadata.name.as_deref(), Some("ws1"));
        assert_eq!(pod.metadata.namespace.as_deref(), Some("dev"));

        let clone = clone_container(&pod).unwrap();
        assert_eq!(clone.image.as_deref(), Some(CLONE_IMAGE));
        assert_eq!(clone.working_dir.as_deref(), Some(WORKSPACE_DIR));
        assert_eq!(
            clone.args.as_ref().unwrap(),
            &["clone", "https://example.git", "app"]
        );

        let main = main_container(&pod).unwrap();
        assert_eq!(main.image.as_deref(), Some("img:latest"));
        assert_eq!(
            main.args.as_ref().unwrap(),
            &["--auth", "none", "/workspace/app"]
        );
        let port = &main.ports.as_ref().unwrap()[0];
        assert_eq!(port.container_port, 8080);
        assert_eq!(port.name.as_deref(), Some(IDE_PORT_NAME));
    }

    #[test]
    fn test_both_steps_share_the_workspace_volume() {
        let workspace = create_test_workspace("ws1", "dev");
        let pod = desired_pod(&workspace);
        let spec = pod.spec.as_ref().unwrap();

        let volumes = spec.volumes.as_ref().unwrap();
        assert_eq!(volumes.len(), 1);
        assert!(volumes[0].empty_dir.is_some(), "Scratch volume must be ephemeral");

        for container in spec
            .init_containers
            .iter()
            .flatten()
            .chain(spec.containers.iter())
        {
            let mounts = container.volume_mounts.as_ref().unwrap();
            assert_eq!(mounts.len(), 1);
            assert_eq!(mounts[0].name, volumes[0].name);
            assert_eq!(mounts[0].mount_path, WORKSPACE_DIR);
        }
    }

    #[test]
    fn test_resources_copied_verbatim() {
        let workspace = create_test_workspace_with_resources("ws1", "dev");
        let pod = desired_pod(&workspace);

        let resources = main_container(&pod).unwrap().resources.as_ref().unwrap();
        let requests = resources.requests.as_ref().unwrap();
        assert_eq!(requests["cpu"], Quantity("500m".to_string()));
        assert_eq!(requests["memory"], Quantity("1Gi".to_string()));
        let limits = resources.limits.as_ref().unwrap();
        assert_eq!(limits["cpu"], Quantity("1".to_string()));
        assert_eq!(limits["memory"], Quantity("2Gi".to_string()));
    }

    #[test]
    fn test_pod_without_resources_has_none() {
        let workspace = create_test_workspace("ws1", "dev");
        let pod = desired_pod(&workspace);
        assert!(main_container(&pod).unwrap().resources.is_none());
    }

    #[test]
    fn test_identical_pods_have_not_drifted() {
        let workspace = create_test_workspace_with_resources("ws1", "dev");
        assert!(!pod_drifted(&desired_pod(&workspace), &desired_pod(&workspace)));
    }

    #[test]
    fn test_changed_image_is_drift() {
        let workspace = create_test_workspace("ws1", "dev");
        let desired = desired_pod(&workspace);

        let mut updated = workspace.clone();
        updated.spec.image = "img:next".to_string();
        let observed = desired_pod(&updated);

        assert!(pod_drifted(&desired, &observed));
    }

    #[test]
    fn test_changed_repo_is_drift() {
        let workspace = create_test_workspace("ws1", "dev");
        let desired = desired_pod(&workspace);

        let mut updated = workspace.clone();
        updated.spec.repo.url = "https://other.git".to_string();
        let observed = desired_pod(&updated);

        assert!(pod_drifted(&desired, &observed));
    }
}
