//! Clean command - removes staging roots.
//!
//! Removes the definition's configured staging root, then sweeps any
//! generated `rpmforge-tmp-*` roots out of the working directory (left
//! behind by `keep_temp` runs or failed builds).

use anyhow::Result;
use std::path::Path;

use crate::common::{temp, GENERATED_ROOT_PREFIX};
use crate::config::BuildDefinition;

/// Execute the clean command.
pub fn cmd_clean(definition_path: &Path) -> Result<()> {
    let mut cleaned = false;

    // The definition file is optional here; generated roots are sweepable
    // without one.
    if definition_path.exists() {
        let definition = BuildDefinition::load(definition_path)?;
        if let Some(root) = &definition.package.temp_dir {
            if root.exists() {
                println!("Removing {}...", root.display());
                temp::remove_tree(root)?;
                cleaned = true;
            }
        }
    }

    for entry in glob::glob(&format!("{}*", GENERATED_ROOT_PREFIX))? {
        let root = entry?;
        if root.is_dir() {
            println!("Removing {}...", root.display());
            temp::remove_tree(&root)?;
            cleaned = true;
        }
    }

    if cleaned {
        println!("Clean complete.");
    } else {
        println!("No staging roots to clean.");
    }

    Ok(())
}
