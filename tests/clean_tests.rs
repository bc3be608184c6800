//! Integration tests for `kcl clean`

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn test_clean_removes_build_and_module_cache() {
    let workspace = TestWorkspace::new();
    workspace.create_package("", "demo", "0.1.0");
    workspace.write_file(".kclvm/cache/main.k.cache", "x");
    workspace.write_file("sub/__main__/.kclvm/cache/a", "x");
    std::fs::write(workspace.home.join("k8s_1.28"), "x").unwrap();

    workspace
        .kcl()
        .current_dir(workspace.path.join("sub"))
        .args(["clean", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    assert!(!workspace.file_exists(".kclvm/cache"));
    assert!(!workspace.file_exists("sub/__main__/.kclvm/cache"));
    assert!(!workspace.home.exists());
}

#[test]
fn test_clean_explicit_path() {
    let workspace = TestWorkspace::new();
    workspace.write_file("proj/.kclvm/cache/a", "x");

    workspace
        .kcl()
        .args(["clean", "proj", "--yes"])
        .assert()
        .success();

    assert!(!workspace.file_exists("proj/.kclvm/cache"));
    assert!(workspace.file_exists("proj/.kclvm"));
}
