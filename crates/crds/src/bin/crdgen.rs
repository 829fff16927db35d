//! Emits the Workspace CRD manifest as YAML on stdout.
//!
//! Usage: `cargo run --bin crdgen > deploy/crds/workspace.yaml`

use kube::CustomResourceExt;

fn main() {
    match serde_yaml::to_string(&crds::Workspace::crd()) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => {
            eprintln!("Failed to serialize Workspace CRD: {e}");
            std::process::exit(1);
        }
    }
}
