//! File staging into the build root.
//!
//! Copies every mapped source file to `BUILDROOT/<dest>/<srcpath>` and
//! records, per copied file, its quoted packaged path (the `%files`
//! manifest) and any attribute commands. Staging returns these as an
//! explicit [`StageOutput`] value; the descriptor writer consumes it
//! exactly once.

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::attrs;
use crate::common::{files, paths};
use crate::config::FileMapping;
use crate::error::PackageError;
use crate::layout::StagingLayout;

/// Everything the descriptor needs from staging, in copy order.
#[derive(Debug, Default)]
pub struct StageOutput {
    /// One quoted packaged path per copied file, with its `%config`/`%doc`
    /// marker when the mapping declared one.
    pub manifest: Vec<String>,
    /// `chmod`/`chown`/`chgrp` lines for the `%post` scriptlet.
    pub attr_commands: Vec<String>,
}

impl StageOutput {
    /// Number of files staged; the manifest has exactly one entry per copy.
    pub fn staged_files(&self) -> usize {
        self.manifest.len()
    }
}

/// Reject mappings missing a source list or destination. Runs over the
/// whole mapping list before anything is copied, so a bad mapping aborts
/// the run with no partial staging from earlier mappings.
pub fn validate_mappings(mappings: &[FileMapping]) -> Result<()> {
    for (index, mapping) in mappings.iter().enumerate() {
        if mapping.src.is_empty() {
            return Err(PackageError::Configuration(format!(
                "file mapping #{} has no sources; every mapping needs both `src` and `dest`",
                index + 1
            ))
            .into());
        }
        if mapping.dest.is_none() {
            return Err(PackageError::Configuration(format!(
                "file mapping #{} has no destination; every mapping needs both `src` and `dest`",
                index + 1
            ))
            .into());
        }
    }
    Ok(())
}

/// Copy every mapped file into the build root.
///
/// `exclusions` holds normalized paths and membership is exact: patterns
/// were expanded once before this point and are never re-matched here.
/// Excluded sources, directory sources, and sources already inside the
/// staging root are skipped without error; only regular-file copies produce
/// manifest entries.
pub fn stage_files(
    layout: &StagingLayout,
    mappings: &[FileMapping],
    exclusions: &BTreeSet<PathBuf>,
) -> Result<StageOutput> {
    validate_mappings(mappings)?;

    let build_root = layout.build_root();
    let mut output = StageOutput::default();

    for mapping in mappings {
        let Some(dest) = mapping.dest.as_deref() else {
            continue; // unreachable after validation
        };

        for src in &mapping.src {
            if exclusions.contains(&paths::normalize(src)) {
                continue;
            }

            let resolved = match &mapping.cwd {
                Some(cwd) => cwd.join(src),
                None => src.clone(),
            };

            if resolved.is_dir() {
                continue;
            }

            // Never stage a previous run's staging tree into this one.
            if paths::is_within(&resolved, layout.root())? {
                continue;
            }

            let packaged = packaged_path(dest, src);
            files::copy_file_with_dirs(&resolved, &build_root.join(&packaged))?;

            let quoted = format!("\"{}\"", packaged.display());
            if mapping.config {
                output.manifest.push(format!("%config {}", quoted));
            } else if mapping.doc {
                output.manifest.push(format!("%doc {}", quoted));
            } else {
                output.manifest.push(quoted.clone());
            }

            output.attr_commands.extend(attrs::translate(
                &quoted,
                mapping.mode.as_deref(),
                mapping.owner.as_deref(),
                mapping.group.as_deref(),
            ));
        }
    }

    Ok(output)
}

/// Join the mapping destination with the source path to form the packaged
/// path. Root components of the source are stripped first, so an absolute
/// source still lands under `dest` rather than replacing it.
fn packaged_path(dest: &Path, src: &Path) -> PathBuf {
    let relative: PathBuf = src
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    paths::normalize(&dest.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaged_path_joins_dest_and_src() {
        assert_eq!(
            packaged_path(Path::new("usr/bin"), Path::new("a.txt")),
            PathBuf::from("usr/bin/a.txt")
        );
    }

    #[test]
    fn packaged_path_keeps_source_subdirs() {
        assert_eq!(
            packaged_path(Path::new("opt/app"), Path::new("lib/core.so")),
            PathBuf::from("opt/app/lib/core.so")
        );
    }

    #[test]
    fn packaged_path_strips_source_root() {
        assert_eq!(
            packaged_path(Path::new("usr/bin"), Path::new("/app")),
            PathBuf::from("usr/bin/app")
        );
    }

    #[test]
    fn packaged_path_normalizes_dot_segments() {
        assert_eq!(
            packaged_path(Path::new("usr/bin"), Path::new("./a.txt")),
            PathBuf::from("usr/bin/a.txt")
        );
    }
}
