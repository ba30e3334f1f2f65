//! Descriptor (`.spec`) synthesis.
//!
//! The section order is fixed: topdir define, metadata block, `Requires`,
//! `%description`, `%files` (with `%defattr` directives), `%pre`, `%post`
//! (attribute commands first), `%preun`, `%postun`. Text fields are emitted
//! verbatim; nothing is escaped or validated here; rpmbuild is the arbiter
//! of descriptor syntax and rejects malformed content at build time.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::common::files;
use crate::config::PackageConfig;
use crate::layout::StagingLayout;
use crate::stage::StageOutput;

/// Render the full descriptor text. Pure: same inputs, same bytes.
pub fn render(topdir: &Path, config: &PackageConfig, staged: &StageOutput) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("%define\t _topdir {}", topdir.display()));
    lines.push(String::new());
    lines.push(format!("Name: {}", config.name));
    lines.push(format!("Version: {}", config.version));
    lines.push(format!("Group: {}", config.group));
    lines.push(format!("Release: {}", config.release));
    lines.push(format!("Summary: {}", config.summary));
    lines.push(format!("License: {}", config.license));
    lines.push(format!("BuildArch: {}", config.build_arch));

    if !config.dependencies.is_empty() {
        lines.push(format!("Requires: {}", config.dependencies.join(",")));
    }

    lines.push(String::new());
    lines.push("%description".to_string());
    lines.push(config.description.clone());

    lines.push(String::new());
    lines.push("%files".to_string());
    for defattr in &config.defattr_script {
        lines.push(format!(
            "%defattr({}, {}, {}, {})",
            defattr.file_mode.as_deref().unwrap_or("-"),
            defattr.user.as_deref().unwrap_or("-"),
            defattr.group.as_deref().unwrap_or("-"),
            defattr.dir_mode.as_deref().unwrap_or("-"),
        ));
    }
    lines.extend(staged.manifest.iter().cloned());

    lines.push(String::new());
    lines.push("%pre".to_string());
    lines.extend(config.pre_install_script.iter().cloned());

    lines.push(String::new());
    lines.push("%post".to_string());
    // Attribute fixes run before any user post-install line.
    lines.extend(staged.attr_commands.iter().cloned());
    lines.extend(config.post_install_script.iter().cloned());

    lines.push(String::new());
    lines.push("%preun".to_string());
    lines.extend(config.pre_uninstall_script.iter().cloned());

    lines.push(String::new());
    lines.push("%postun".to_string());
    lines.extend(config.post_uninstall_script.iter().cloned());

    lines.join("\n")
}

/// Render and write the descriptor to its conventional path
/// (`SPECS/<name>-<version>-<arch>.spec`), returning that path.
pub fn write(
    layout: &StagingLayout,
    config: &PackageConfig,
    staged: &StageOutput,
) -> Result<PathBuf> {
    let path = layout.spec_path(config);
    files::write_file_with_dirs(&path, render(layout.root(), config, staged))?;
    Ok(path)
}
