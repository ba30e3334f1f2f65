//! Build command - runs the full packaging pipeline.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{BuildDefinition, Env, PostPackage};
use crate::pipeline::{self, BuildRequest};

/// Execute the build command.
///
/// Precedence for run settings: CLI flags beat environment overrides, which
/// beat the definition file.
pub fn cmd_build(definition_path: &Path, dest: Option<PathBuf>, discard_temp: bool) -> Result<()> {
    let env = Env::load();
    let definition = BuildDefinition::load(definition_path)?;

    let exclusions = definition.exclusion_set()?;
    let files = definition.expanded_mappings()?;
    let mut config = definition.package;

    if let Some(keep) = env.keep_temp {
        config.keep_temp = keep;
    }
    if discard_temp {
        config.keep_temp = false;
    }
    if let Some(dir) = dest {
        config.post_package = PostPackage::CopyTo(dir);
    }

    let products = pipeline::run(BuildRequest {
        config,
        files,
        exclusions,
        rpmbuild: env.rpmbuild,
    })?;

    println!("  Spec: {}", products.spec_path.display());
    println!("  Checksum: {}", products.checksum_path.display());
    if products.staging_retained {
        println!("  Staging root retained at {}", products.staging_root.display());
    }

    Ok(())
}
