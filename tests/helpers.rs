//! Shared test utilities for rpmforge tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rpmforge::config::{FileMapping, PackageConfig};

/// Test environment with a source directory and a staging root, both inside
/// one temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Directory holding source files to stage.
    pub sources: PathBuf,
    /// Staging root handed to the pipeline.
    pub staging: PathBuf,
}

impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let sources = base.join("sources");
        let staging = base.join("staging");
        fs::create_dir_all(&sources).expect("Failed to create sources dir");

        Self {
            _temp_dir: temp_dir,
            sources,
            staging,
        }
    }

    /// Create a source file under the sources dir, parents included.
    pub fn add_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.sources.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source parent");
        }
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Package config pointing at this environment's staging root.
    pub fn config(&self, name: &str) -> PackageConfig {
        PackageConfig {
            name: name.to_string(),
            temp_dir: Some(self.staging.clone()),
            ..PackageConfig::default()
        }
    }

    /// Mapping whose relative sources resolve against the sources dir.
    pub fn mapping(&self, src: &[&str], dest: &str) -> FileMapping {
        FileMapping {
            src: src.iter().map(PathBuf::from).collect(),
            dest: Some(PathBuf::from(dest)),
            cwd: Some(self.sources.clone()),
            ..FileMapping::default()
        }
    }
}

/// Write an executable stub standing in for the packaging tool.
pub fn write_stub_tool(path: &Path, script: &str) {
    fs::write(path, script).expect("Failed to write stub tool");
    let mut perms = fs::metadata(path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to chmod stub");
}

/// Stub script that creates the conventional artifact (copying the spec it
/// was handed, so the artifact has deterministic content) and exits 0.
pub fn stub_success(artifact: &Path) -> String {
    format!(
        "#!/bin/sh\nmkdir -p '{}'\ncp \"$4\" '{}'\nexit 0\n",
        artifact.parent().expect("artifact parent").display(),
        artifact.display()
    )
}

/// Stub script that prints to stderr and exits 1 without producing anything.
pub fn stub_failure() -> String {
    "#!/bin/sh\necho 'stub rpmbuild: simulated failure' >&2\nexit 1\n".to_string()
}
