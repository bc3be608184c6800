//! Integration tests for `kcl mod pull`

mod common;

use common::{TestWorkspace, file_url, init_git_repo};
use predicates::prelude::*;

#[test]
fn test_pull_git_repository() {
    let workspace = TestWorkspace::new();
    let origin = workspace.temp.path().join("konfig");
    init_git_repo(
        &origin,
        &[
            ("kcl.mod", "[package]\nname = \"konfig\"\nversion = \"0.4.0\"\n"),
            ("base/main.k", "a = 1\n"),
        ],
        "v0.4.0",
    );

    workspace
        .kcl()
        .args(["mod", "pull", "--git", &file_url(&origin), "--tag", "v0.4.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("successfully"));

    assert!(workspace.file_exists("konfig/kcl.mod"));
    assert!(workspace.file_exists("konfig/base/main.k"));
    assert!(!workspace.file_exists("konfig/.git"));
}

#[test]
fn test_pull_sub_package_into_local_path() {
    let workspace = TestWorkspace::new();
    let origin = workspace.temp.path().join("modules");
    init_git_repo(
        &origin,
        &[
            ("helloworld/kcl.mod", "[package]\nname = \"helloworld\"\n"),
            ("helloworld/main.k", "hello = 'world'\n"),
            ("other/kcl.mod", "[package]\nname = \"other\"\n"),
        ],
        "v0.1.0",
    );

    workspace
        .kcl()
        .args([
            "mod",
            "pull",
            "helloworld",
            "pkgs",
            "--git",
            &file_url(&origin),
            "--tag",
            "v0.1.0",
        ])
        .assert()
        .success();

    assert!(workspace.file_exists("pkgs/helloworld/main.k"));
    assert!(!workspace.file_exists("pkgs/helloworld/other"));
}

#[test]
fn test_pull_registry_spec_is_unsupported() {
    let workspace = TestWorkspace::new();
    workspace
        .kcl()
        .args(["mod", "pull", "k8s:1.28"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "fetching 'oci://ghcr.io/kcl-lang/k8s?tag=1.28' is not supported",
        ));
}

#[test]
fn test_pull_oci_with_commit_is_rejected() {
    let workspace = TestWorkspace::new();
    workspace
        .kcl()
        .args([
            "mod",
            "pull",
            "--oci",
            "oci://ghcr.io/kcl-lang/helloworld",
            "--commit",
            "abc123",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported for oci sources"));
}

#[test]
fn test_pull_into_non_empty_target() {
    let workspace = TestWorkspace::new();
    workspace.create_package("src/shared", "shared", "0.1.0");
    workspace.write_file("out/shared/keep.k", "a = 1\n");

    workspace
        .kcl()
        .args(["mod", "pull", "src/shared", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists and is not empty"));
}

#[test]
fn test_pull_without_source() {
    let workspace = TestWorkspace::new();
    workspace
        .kcl()
        .args(["mod", "pull"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no package source specified"));
}
