//! Show command - displays the resolved definition or the staged tree.

use anyhow::{bail, Result};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::{BuildDefinition, Env};
use crate::layout::StagingLayout;

/// What to show.
pub enum ShowTarget {
    /// The resolved definition and environment.
    Config,
    /// The staged build-root tree of the configured staging root.
    Tree,
}

/// Execute the show command.
pub fn cmd_show(definition_path: &Path, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => show_config(definition_path),
        ShowTarget::Tree => show_tree(definition_path),
    }
}

fn show_config(definition_path: &Path) -> Result<()> {
    let env = Env::load();
    let definition = BuildDefinition::load(definition_path)?;
    let config = &definition.package;

    println!("Package:");
    println!("  name: {}", config.name);
    println!("  version: {}-{}", config.version, config.release);
    println!("  arch: {}", config.build_arch);
    println!("  license: {}", config.license);
    println!("  group: {}", config.group);
    if !config.dependencies.is_empty() {
        println!("  requires: {}", config.dependencies.join(","));
    }
    println!("Run settings:");
    match &config.temp_dir {
        Some(dir) => println!("  staging root: {}", dir.display()),
        None => println!("  staging root: (generated per run)"),
    }
    println!("  keep staging root: {}", config.keep_temp);
    println!("  post-package: {:?}", config.post_package);
    println!("  packaging tool: {}", env.rpmbuild.display());
    println!("Inputs:");
    println!("  {} file mapping(s)", definition.files.len());
    println!("  {} exclude pattern(s)", definition.exclude_files.len());

    Ok(())
}

fn show_tree(definition_path: &Path) -> Result<()> {
    let definition = BuildDefinition::load(definition_path)?;

    let Some(root) = &definition.package.temp_dir else {
        bail!(
            "No temp_dir configured in {}; generated staging roots live under {}*",
            definition_path.display(),
            crate::common::GENERATED_ROOT_PREFIX
        );
    };

    let build_root = root.join("BUILDROOT");
    if !build_root.is_dir() {
        bail!(
            "No staged tree at {} (run `rpmforge spec` or `rpmforge build` first)",
            build_root.display()
        );
    }

    println!("Staged files under {}:", build_root.display());
    let mut count = 0usize;
    for entry in WalkDir::new(&build_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&build_root)
            .unwrap_or_else(|_| entry.path());
        println!("  {}", relative.display());
        count += 1;
    }
    println!("{} file(s)", count);

    // The descriptor lives in the same tree, if it has been written.
    let spec_path = root
        .join("SPECS")
        .join(StagingLayout::spec_filename(&definition.package));
    if spec_path.exists() {
        println!("Spec: {}", spec_path.display());
    }

    Ok(())
}
