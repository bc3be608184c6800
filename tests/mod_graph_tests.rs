//! Integration tests for `kcl mod graph` and `kcl mod metadata`

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

fn workspace_with_dependencies() -> TestWorkspace {
    let workspace = TestWorkspace::new();
    workspace.create_package("shared", "shared", "0.2.0");
    workspace.write_file(
        "app/kcl.mod",
        "[package]\nname = \"app\"\nversion = \"0.1.0\"\n\n\
         [dependencies]\nshared = { path = \"../shared\" }\nk8s = \"1.28\"\n",
    );
    workspace
}

#[test]
fn test_graph_prints_edges() {
    let workspace = workspace_with_dependencies();
    workspace
        .kcl()
        .current_dir(workspace.path.join("app"))
        .args(["mod", "graph"])
        .assert()
        .success()
        .stdout("app@0.1.0 shared@0.2.0\napp@0.1.0 k8s@1.28\n");
}

#[test]
fn test_graph_without_manifest() {
    let workspace = TestWorkspace::new();
    workspace
        .kcl()
        .args(["mod", "graph"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load 'kcl.mod'"))
        .stderr(predicate::str::contains("kcl mod init"));
}

#[test]
fn test_metadata_json() {
    let workspace = workspace_with_dependencies();
    let output = workspace
        .kcl()
        .current_dir(workspace.path.join("app"))
        .args(["mod", "metadata"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let k8s = value["packages"]["k8s"]["manifest_path"].as_str().unwrap();
    assert!(k8s.ends_with("k8s_1.28"));
    assert!(k8s.starts_with(workspace.home.to_str().unwrap()));
    let shared = value["packages"]["shared"]["manifest_path"].as_str().unwrap();
    assert!(shared.ends_with("shared"));
}

#[test]
fn test_metadata_vendor() {
    let workspace = workspace_with_dependencies();
    workspace
        .kcl()
        .current_dir(workspace.path.join("app"))
        .args(["mod", "metadata", "--vendor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vendor"));
}
