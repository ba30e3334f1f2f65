//! Package definition loading and environment overrides.
//!
//! A packaging run is described by a JSON definition file (default
//! `rpmforge.json`): package metadata under `package`, the source-to-destination
//! copy mappings under `files`, and exclusion patterns under
//! `exclude_files`. Every `package` field has a default, so an empty object
//! is a valid (if useless) definition.
//!
//! Glob patterns (in `exclude_files` and in `files[].src`) are expanded
//! exactly once at load time into concrete paths. Staging never re-matches
//! patterns; it only compares normalized paths.
//!
//! Ambient settings come from the environment (`.env` is loaded by `main`
//! via dotenvy; real environment variables take precedence).

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;

/// Callback invoked with the artifact's containing directory and filename.
pub type PostPackageFn = Box<dyn FnMut(&Path, &str) -> Result<()>>;

/// What happens to the artifact once it exists.
pub enum PostPackage {
    /// Leave it where rpmbuild put it.
    None,
    /// Copy it into this directory, which must already exist.
    CopyTo(PathBuf),
    /// Hand it to a caller-supplied hook. Library-only; the definition file
    /// expresses the copy form via `post_package_copy_to`.
    Invoke(PostPackageFn),
}

impl Default for PostPackage {
    fn default() -> Self {
        PostPackage::None
    }
}

impl fmt::Debug for PostPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostPackage::None => write!(f, "None"),
            PostPackage::CopyTo(dir) => write!(f, "CopyTo({})", dir.display()),
            PostPackage::Invoke(_) => write!(f, "Invoke(..)"),
        }
    }
}

fn post_package_from_copy_to<'de, D>(deserializer: D) -> Result<PostPackage, D::Error>
where
    D: Deserializer<'de>,
{
    let dest: Option<PathBuf> = Option::deserialize(deserializer)?;
    Ok(dest.map(PostPackage::CopyTo).unwrap_or_default())
}

/// One `%defattr` directive. Unset fields render as the `-` wildcard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefAttr {
    pub file_mode: Option<String>,
    pub user: Option<String>,
    pub group: Option<String>,
    pub dir_mode: Option<String>,
}

/// Package metadata and run settings, supplied once per run.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub name: String,
    pub version: String,
    pub release: String,
    pub summary: String,
    pub description: String,
    pub license: String,
    pub group: String,
    pub build_arch: String,
    /// Ordered; joined with commas into one `Requires:` clause.
    pub dependencies: Vec<String>,
    /// Raw shell lines, emitted verbatim into the matching scriptlet.
    pub pre_install_script: Vec<String>,
    pub post_install_script: Vec<String>,
    pub pre_uninstall_script: Vec<String>,
    pub post_uninstall_script: Vec<String>,
    pub defattr_script: Vec<DefAttr>,
    /// Staging root override. `None` generates a unique `rpmforge-tmp-*`
    /// path under the working directory.
    pub temp_dir: Option<PathBuf>,
    #[serde(
        rename = "post_package_copy_to",
        deserialize_with = "post_package_from_copy_to"
    )]
    pub post_package: PostPackage,
    /// Whether the staging root survives a successful run.
    pub keep_temp: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: "noname".to_string(),
            version: "0.1.0".to_string(),
            release: "1".to_string(),
            summary: "No Summary".to_string(),
            description: "No Description".to_string(),
            license: "MIT".to_string(),
            group: "Development/Tools".to_string(),
            build_arch: "noarch".to_string(),
            dependencies: Vec::new(),
            pre_install_script: Vec::new(),
            post_install_script: Vec::new(),
            pre_uninstall_script: Vec::new(),
            post_uninstall_script: Vec::new(),
            defattr_script: Vec::new(),
            temp_dir: None,
            post_package: PostPackage::None,
            keep_temp: true,
        }
    }
}

/// One requested copy operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileMapping {
    /// Source paths. In the definition file these may be glob patterns;
    /// [`BuildDefinition::expanded_mappings`] resolves them to concrete
    /// paths before staging.
    pub src: Vec<PathBuf>,
    /// Destination directory relative to the build root. Required; a
    /// mapping without one is a configuration error.
    pub dest: Option<PathBuf>,
    /// Resolve relative sources against this directory instead of the
    /// working directory. Packaged paths keep the cwd-relative form.
    pub cwd: Option<PathBuf>,
    /// Mark every file in this mapping `%config`.
    pub config: bool,
    /// Mark every file `%doc`. Ignored when `config` is also set.
    pub doc: bool,
    pub mode: Option<String>,
    pub owner: Option<String>,
    pub group: Option<String>,
}

/// The on-disk definition file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildDefinition {
    pub package: PackageConfig,
    pub files: Vec<FileMapping>,
    /// Glob patterns whose matches are excluded from staging.
    pub exclude_files: Vec<String>,
}

impl BuildDefinition {
    /// Load a definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition file {}", path.display()))?;
        let definition: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(definition)
    }

    /// Expand the exclusion patterns into the exact-match set staging uses.
    /// Patterns that match nothing contribute nothing.
    pub fn exclusion_set(&self) -> Result<BTreeSet<PathBuf>> {
        let mut set = BTreeSet::new();
        for pattern in &self.exclude_files {
            for entry in glob::glob(pattern)
                .with_context(|| format!("Invalid exclude pattern `{}`", pattern))?
            {
                let path =
                    entry.with_context(|| format!("Failed to expand `{}`", pattern))?;
                set.insert(paths::normalize(&path));
            }
        }
        Ok(set)
    }

    /// Expand glob sources in every mapping to concrete ordered paths.
    /// Plain paths pass through untouched; patterns are matched relative to
    /// the mapping's `cwd` when set, and the results are recorded relative
    /// to it (the stager re-applies `cwd` when it resolves the copy source).
    pub fn expanded_mappings(&self) -> Result<Vec<FileMapping>> {
        self.files
            .iter()
            .map(|mapping| {
                let mut expanded = mapping.clone();
                expanded.src = expand_sources(mapping)?;
                Ok(expanded)
            })
            .collect()
    }
}

fn is_pattern(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

fn expand_sources(mapping: &FileMapping) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for src in &mapping.src {
        let text = src.to_string_lossy();
        if !is_pattern(&text) {
            sources.push(src.clone());
            continue;
        }

        let pattern = match &mapping.cwd {
            Some(cwd) => cwd.join(src).to_string_lossy().into_owned(),
            None => text.into_owned(),
        };

        for entry in
            glob::glob(&pattern).with_context(|| format!("Invalid source pattern `{}`", pattern))?
        {
            let path = entry.with_context(|| format!("Failed to expand `{}`", pattern))?;
            let relative = match &mapping.cwd {
                Some(cwd) => path.strip_prefix(cwd).unwrap_or(&path).to_path_buf(),
                None => path,
            };
            sources.push(relative);
        }
    }

    Ok(sources)
}

/// Ambient environment overrides.
#[derive(Debug, Clone)]
pub struct Env {
    /// Packaging binary to invoke (`RPMFORGE_RPMBUILD`, default `rpmbuild`).
    pub rpmbuild: PathBuf,
    /// Staging-root retention override (`RPMFORGE_KEEP_TEMP`; `0`, `false`
    /// and `no` force deletion, anything else forces retention).
    pub keep_temp: Option<bool>,
}

impl Env {
    /// Read overrides from the environment. `main` loads `.env` first, so
    /// real environment variables win over file entries.
    pub fn load() -> Self {
        let rpmbuild = env::var("RPMFORGE_RPMBUILD")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rpmbuild"));
        let keep_temp = env::var("RPMFORGE_KEEP_TEMP")
            .ok()
            .map(|value| !matches!(value.trim(), "0" | "false" | "no"));
        Self { rpmbuild, keep_temp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_definition_uses_defaults() {
        let definition: BuildDefinition = serde_json::from_str("{}").unwrap();
        let config = &definition.package;

        assert_eq!(config.name, "noname");
        assert_eq!(config.version, "0.1.0");
        assert_eq!(config.release, "1");
        assert_eq!(config.license, "MIT");
        assert_eq!(config.group, "Development/Tools");
        assert_eq!(config.build_arch, "noarch");
        assert!(config.keep_temp);
        assert!(config.temp_dir.is_none());
        assert!(matches!(config.post_package, PostPackage::None));
        assert!(definition.files.is_empty());
        assert!(definition.exclude_files.is_empty());
    }

    #[test]
    fn copy_to_field_becomes_tagged_variant() {
        let definition: BuildDefinition =
            serde_json::from_str(r#"{"package": {"post_package_copy_to": "dist"}}"#).unwrap();
        match &definition.package.post_package {
            PostPackage::CopyTo(dir) => assert_eq!(dir, &PathBuf::from("dist")),
            other => panic!("expected CopyTo, got {:?}", other),
        }
    }

    #[test]
    fn mapping_fields_deserialize() {
        let mapping: FileMapping = serde_json::from_str(
            r#"{"src": ["bin/app"], "dest": "usr/bin", "mode": "755", "config": true}"#,
        )
        .unwrap();

        assert_eq!(mapping.src, vec![PathBuf::from("bin/app")]);
        assert_eq!(mapping.dest, Some(PathBuf::from("usr/bin")));
        assert_eq!(mapping.mode.as_deref(), Some("755"));
        assert!(mapping.config);
        assert!(!mapping.doc);
        assert!(mapping.owner.is_none());
    }

    #[test]
    #[serial]
    fn env_defaults_to_rpmbuild() {
        std::env::remove_var("RPMFORGE_RPMBUILD");
        std::env::remove_var("RPMFORGE_KEEP_TEMP");

        let env = Env::load();
        assert_eq!(env.rpmbuild, PathBuf::from("rpmbuild"));
        assert!(env.keep_temp.is_none());
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        std::env::set_var("RPMFORGE_RPMBUILD", "/opt/bin/rpmbuild");
        std::env::set_var("RPMFORGE_KEEP_TEMP", "0");

        let env = Env::load();
        assert_eq!(env.rpmbuild, PathBuf::from("/opt/bin/rpmbuild"));
        assert_eq!(env.keep_temp, Some(false));

        std::env::remove_var("RPMFORGE_RPMBUILD");
        std::env::remove_var("RPMFORGE_KEEP_TEMP");
    }
}
