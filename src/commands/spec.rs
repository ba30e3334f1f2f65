//! Spec command - stages files and writes the descriptor, without building.
//!
//! Useful for inspecting exactly what rpmbuild would be handed.

use anyhow::Result;
use std::path::Path;

use crate::config::{BuildDefinition, Env};
use crate::pipeline::{self, BuildRequest};

/// Execute the spec command. Prints the descriptor path on success.
pub fn cmd_spec(definition_path: &Path) -> Result<()> {
    let env = Env::load();
    let definition = BuildDefinition::load(definition_path)?;

    let exclusions = definition.exclusion_set()?;
    let files = definition.expanded_mappings()?;

    let request = BuildRequest {
        config: definition.package,
        files,
        exclusions,
        rpmbuild: env.rpmbuild,
    };

    let staged = pipeline::prepare(&request)?;
    println!("{}", staged.spec_path.display());

    Ok(())
}
