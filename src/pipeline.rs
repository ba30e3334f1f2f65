//! The packaging pipeline.
//!
//! Runs strictly in sequence and stops at the first failure: delete any
//! stale staging root, create the staging tree, stage files, write the
//! descriptor, invoke the packaging tool, verify the artifact, write its
//! checksum sidecar, then run the post-package step. Cleanup only happens
//! on the success path; a failed run leaves the staging root (descriptor
//! included) behind for inspection.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::temp;
use crate::config::{FileMapping, PackageConfig, PostPackage};
use crate::error::PackageError;
use crate::layout::StagingLayout;
use crate::process::Cmd;
use crate::specfile;
use crate::stage::{self, StageOutput};

/// One packaging run: the configuration plus the concrete inputs staging
/// needs. Exclusions are already-expanded normalized paths; the pipeline
/// never re-matches patterns.
pub struct BuildRequest {
    pub config: PackageConfig,
    pub files: Vec<FileMapping>,
    pub exclusions: BTreeSet<PathBuf>,
    /// Packaging binary to invoke.
    pub rpmbuild: PathBuf,
}

impl BuildRequest {
    pub fn new(config: PackageConfig, files: Vec<FileMapping>) -> Self {
        Self {
            config,
            files,
            exclusions: BTreeSet::new(),
            rpmbuild: PathBuf::from("rpmbuild"),
        }
    }
}

/// The staged front half of a run: tree built, descriptor written, nothing
/// executed yet.
pub struct StagedBuild {
    pub layout: StagingLayout,
    pub staged: StageOutput,
    pub spec_path: PathBuf,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct BuildProducts {
    pub staging_root: PathBuf,
    pub spec_path: PathBuf,
    pub artifact_path: PathBuf,
    pub checksum_path: PathBuf,
    pub staged_files: usize,
    /// False when the staging root was discarded after the build.
    pub staging_retained: bool,
}

/// Resolve the staging root for a request: the configured one, or a fresh
/// generated `rpmforge-tmp-*` path.
pub fn staging_root(config: &PackageConfig) -> PathBuf {
    config.temp_dir.clone().unwrap_or_else(temp::generated_root)
}

/// Stage files and write the descriptor: everything up to (not including)
/// the external build. A stale tree at the staging root is deleted first so
/// a re-run never inherits files from a previous run.
pub fn prepare(request: &BuildRequest) -> Result<StagedBuild> {
    let root = staging_root(&request.config);

    if root.exists() {
        println!("Deleting old staging root {}", root.display());
        temp::remove_tree(&root)?;
    }

    println!("Creating staging tree at {}", root.display());
    let layout = StagingLayout::create(&root)?;

    println!("Copying files into the build root");
    let staged = stage::stage_files(&layout, &request.files, &request.exclusions)?;
    println!("  {} file(s) staged", staged.staged_files());

    println!("Writing spec file");
    let spec_path = specfile::write(&layout, &request.config, &staged)?;

    Ok(StagedBuild {
        layout,
        staged,
        spec_path,
    })
}

/// Run the whole pipeline.
pub fn run(mut request: BuildRequest) -> Result<BuildProducts> {
    let StagedBuild {
        layout,
        staged,
        spec_path,
    } = prepare(&request)?;

    let artifact_path = build_artifact(&layout, &request, &spec_path)?;
    let checksum_path = write_checksum(&artifact_path)?;

    post_package(&layout, &mut request.config, &artifact_path)?;

    let staging_retained = request.config.keep_temp;
    if !staging_retained {
        println!("Deleting staging root {}", layout.root().display());
        temp::remove_tree(layout.root())?;
    }

    println!("=== Package Build Complete ===");
    println!("  Artifact: {}", artifact_path.display());

    Ok(BuildProducts {
        staging_root: layout.root().to_path_buf(),
        spec_path,
        artifact_path,
        checksum_path,
        staged_files: staged.staged_files(),
        staging_retained,
    })
}

/// Invoke the packaging tool against the descriptor and build root, then
/// verify the artifact exists at its conventional path.
fn build_artifact(
    layout: &StagingLayout,
    request: &BuildRequest,
    spec_path: &Path,
) -> Result<PathBuf> {
    let program = request.rpmbuild.to_string_lossy().into_owned();
    let build_root = layout.build_root();

    println!("Building RPM package");
    println!(
        "  Execute: {} -bb --buildroot {} {}",
        program,
        build_root.display(),
        spec_path.display()
    );

    let result = Cmd::new(&request.rpmbuild)
        .arg("-bb")
        .arg("--buildroot")
        .arg_path(&build_root)
        .arg_path(spec_path)
        .allow_fail()
        .run()
        .map_err(|e| PackageError::ExternalTool {
            command: program.clone(),
            reason: format!("{:#}", e),
        })?;

    if !result.success() {
        let stderr = result.stderr_trimmed();
        let reason = if stderr.is_empty() {
            format!("exit code {}", result.code())
        } else {
            format!("exit code {}:\n{}", result.code(), stderr)
        };
        return Err(PackageError::ExternalTool {
            command: program,
            reason,
        }
        .into());
    }

    let stdout = result.stdout_trimmed();
    if !stdout.is_empty() {
        println!("{}", stdout);
    }

    let artifact_path = layout.artifact_path(&request.config);
    if !artifact_path.exists() {
        return Err(PackageError::ExternalTool {
            command: program,
            reason: format!(
                "reported success but produced no artifact at {}",
                artifact_path.display()
            ),
        }
        .into());
    }

    Ok(artifact_path)
}

/// Write a `<artifact>.sha256` sidecar next to the artifact.
fn write_checksum(artifact: &Path) -> Result<PathBuf> {
    let bytes = fs::read(artifact)
        .with_context(|| format!("Failed to read {} for checksum", artifact.display()))?;
    let digest = format!("{:x}", Sha256::digest(&bytes));

    let filename = artifact
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = PathBuf::from(format!("{}.sha256", artifact.display()));

    fs::write(&path, format!("{}  {}\n", digest, filename))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Run the configured post-package step against the produced artifact.
fn post_package(
    layout: &StagingLayout,
    config: &mut PackageConfig,
    artifact: &Path,
) -> Result<()> {
    let rpm_dir = layout.rpms_dir().join(&config.build_arch);
    let filename = StagingLayout::artifact_name(config);

    match &mut config.post_package {
        PostPackage::None => {}
        PostPackage::CopyTo(dest) => {
            if !dest.is_dir() {
                return Err(PackageError::Configuration(format!(
                    "post-package destination {} is not a directory",
                    dest.display()
                ))
                .into());
            }
            let target = dest.join(&filename);
            fs::copy(artifact, &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    artifact.display(),
                    target.display()
                )
            })?;
            println!("Copied output RPM package to {}", target.display());
        }
        PostPackage::Invoke(callback) => {
            println!("Calling post-package callback");
            callback(&rpm_dir, &filename)
                .map_err(|cause| PackageError::Callback { cause })?;
        }
    }

    Ok(())
}
