//! The rpmbuild staging-tree convention.
//!
//! One packaging run owns one staging root for its lifetime. The root holds
//! the six directories rpmbuild expects under its `_topdir`; staged files go
//! under `BUILDROOT`, the descriptor under `SPECS`, and the finished package
//! appears under `RPMS/<arch>/`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::config::PackageConfig;

/// The directories rpmbuild expects under its topdir.
pub const RPM_TREE: [&str; 6] = ["BUILD", "BUILDROOT", "RPMS", "SOURCES", "SPECS", "SRPMS"];

/// Resolved staging layout for one packaging run.
#[derive(Debug, Clone)]
pub struct StagingLayout {
    root: PathBuf,
}

impl StagingLayout {
    /// Create the staging tree at `root`: make the root absolute and create
    /// each conventional subdirectory recursively. Idempotent on a clean
    /// root; the pipeline deletes stale roots before calling this.
    pub fn create(root: &Path) -> Result<Self> {
        let root = paths::absolutize(root)?;
        for name in RPM_TREE {
            let dir = root.join(name);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(Self { root })
    }

    /// Absolute staging root (rpmbuild's `_topdir`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where staged files land.
    pub fn build_root(&self) -> PathBuf {
        self.root.join("BUILDROOT")
    }

    /// Where the descriptor is written.
    pub fn specs_dir(&self) -> PathBuf {
        self.root.join("SPECS")
    }

    /// Where rpmbuild leaves packages, by architecture.
    pub fn rpms_dir(&self) -> PathBuf {
        self.root.join("RPMS")
    }

    /// Descriptor filename: `<name>-<version>-<arch>.spec`.
    pub fn spec_filename(config: &PackageConfig) -> String {
        format!(
            "{}-{}-{}.spec",
            config.name, config.version, config.build_arch
        )
    }

    /// Descriptor path: `SPECS/<spec_filename>`.
    pub fn spec_path(&self, config: &PackageConfig) -> PathBuf {
        self.specs_dir().join(Self::spec_filename(config))
    }

    /// Conventional artifact filename: `<name>-<version>-<release>.<arch>.rpm`.
    pub fn artifact_name(config: &PackageConfig) -> String {
        format!(
            "{}-{}-{}.{}.rpm",
            config.name, config.version, config.release, config.build_arch
        )
    }

    /// Where rpmbuild conventionally leaves the artifact:
    /// `RPMS/<arch>/<artifact_name>`.
    pub fn artifact_path(&self, config: &PackageConfig) -> PathBuf {
        self.rpms_dir()
            .join(&config.build_arch)
            .join(Self::artifact_name(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageConfig;
    use tempfile::TempDir;

    fn sample_config() -> PackageConfig {
        PackageConfig {
            name: "webapp".to_string(),
            version: "2.1.0".to_string(),
            release: "3".to_string(),
            build_arch: "x86_64".to_string(),
            ..PackageConfig::default()
        }
    }

    #[test]
    fn create_makes_all_six_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("staging");

        let layout = StagingLayout::create(&root).unwrap();

        for name in RPM_TREE {
            assert!(layout.root().join(name).is_dir(), "missing {}", name);
        }
    }

    #[test]
    fn create_is_idempotent_on_clean_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("staging");

        StagingLayout::create(&root).unwrap();
        StagingLayout::create(&root).unwrap();
    }

    #[test]
    fn root_is_absolute() {
        let tmp = TempDir::new().unwrap();
        let layout = StagingLayout::create(&tmp.path().join("staging")).unwrap();
        assert!(layout.root().is_absolute());
    }

    #[test]
    fn spec_path_follows_convention() {
        let tmp = TempDir::new().unwrap();
        let layout = StagingLayout::create(tmp.path()).unwrap();

        let path = layout.spec_path(&sample_config());
        assert!(path.ends_with("SPECS/webapp-2.1.0-x86_64.spec"));
    }

    #[test]
    fn artifact_path_follows_convention() {
        let tmp = TempDir::new().unwrap();
        let layout = StagingLayout::create(tmp.path()).unwrap();

        let path = layout.artifact_path(&sample_config());
        assert!(path.ends_with("RPMS/x86_64/webapp-2.1.0-3.x86_64.rpm"));
    }
}
