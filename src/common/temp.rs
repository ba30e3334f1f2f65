//! Staging-root lifecycle helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Prefix of generated staging roots. `rpmforge clean` sweeps directories
/// carrying this prefix out of the working directory.
pub const GENERATED_ROOT_PREFIX: &str = "rpmforge-tmp-";

/// Generate a unique staging-root path under the working directory.
///
/// Each run gets its own root, so concurrent runs with default settings
/// never share staging state.
pub fn generated_root() -> PathBuf {
    PathBuf::from(format!("{}{}", GENERATED_ROOT_PREFIX, Uuid::new_v4().simple()))
}

/// Remove a directory tree if it exists. Idempotent.
pub fn remove_tree(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_roots_are_unique() {
        assert_ne!(generated_root(), generated_root());
    }

    #[test]
    fn generated_root_carries_prefix() {
        let root = generated_root();
        assert!(root.to_string_lossy().starts_with(GENERATED_ROOT_PREFIX));
    }

    #[test]
    fn remove_tree_tolerates_missing() {
        remove_tree(Path::new("does/not/exist/anywhere")).unwrap();
    }
}
