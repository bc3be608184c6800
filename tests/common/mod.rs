//! Common test utilities for KCL CLI integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch working directory plus an isolated package home
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Working directory commands run in
    pub path: PathBuf,
    /// Package home passed through `KCL_PKG_PATH`
    pub home: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("work");
        let home = temp.path().join("home");
        std::fs::create_dir_all(&path).expect("Failed to create work directory");
        std::fs::create_dir_all(&home).expect("Failed to create home directory");
        Self { temp, path, home }
    }

    /// `kcl` running in the workspace with an isolated package home
    #[allow(deprecated)]
    pub fn kcl(&self) -> Command {
        let mut cmd = Command::cargo_bin("kcl").expect("Failed to find kcl binary");
        cmd.current_dir(&self.path)
            .env("KCL_PKG_PATH", &self.home)
            .env_remove("KPM_REG")
            .env_remove("KPM_REPO")
            .env_remove("KCL_LOG");
        cmd
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write a minimal `kcl.mod` for `name` under `dir` (relative to the workspace)
    pub fn create_package(&self, dir: &str, name: &str, version: &str) -> PathBuf {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        self.write_file(
            &format!("{prefix}kcl.mod"),
            &format!(
                "[package]\nname = \"{name}\"\nedition = \"v0.11.2\"\nversion = \"{version}\"\n"
            ),
        );
        self.path.join(dir)
    }

    /// Executable shell script standing in for the KCL compiler
    #[cfg(unix)]
    pub fn fake_compiler(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.temp.path().join("kclvm_cli");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("Failed to write compiler");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make compiler executable");
        path
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a git repository at `dir` with one commit of `files`, tagged `tag`
pub fn init_git_repo(dir: &Path, files: &[(&str, &str)], tag: &str) -> String {
    std::fs::create_dir_all(dir).expect("Failed to create repository directory");
    let repo = git2::Repository::init(dir).expect("Failed to init repository");

    for (path, content) in files {
        let file = dir.join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(file, content).expect("Failed to write file");
    }

    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Failed to stage files");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let sig = git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
    let commit = repo
        .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("Failed to commit");
    let object = repo.find_object(commit, None).expect("Failed to find commit");
    repo.tag_lightweight(tag, &object, false)
        .expect("Failed to tag commit");
    commit.to_string()
}

/// `file://` url of a local repository
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
