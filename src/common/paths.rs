//! Lexical path normalization and containment checks.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically: drop `.` components, collapse `..` against
/// preceding components, strip redundant separators.
///
/// Works without touching the filesystem, so it applies equally to paths
/// that do not exist yet (packaged paths) and to exclusion entries. Leading
/// `..` components on relative paths are kept; there is nothing to collapse
/// them against.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    let mut normalized = PathBuf::new();
    for component in parts {
        normalized.push(component.as_os_str());
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }

    normalized
}

/// Make a path absolute against the current working directory, then
/// normalize it lexically. Symlinks are not resolved.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize(&absolute))
}

/// True when `path` lies within `root`, comparing both in absolute
/// normalized form.
pub fn is_within(path: &Path, root: &Path) -> Result<bool> {
    Ok(absolutize(path)?.starts_with(absolutize(root)?))
}
