//! Preflight command - checks the host before a build.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::Env;
use crate::preflight;

/// Execute the preflight command. With `strict`, a failed check fails the
/// command (exit code 1).
pub fn cmd_preflight(definition_path: &Path, strict: bool) -> Result<()> {
    let env = Env::load();
    let report = preflight::run_checks(&env, definition_path);
    report.print();

    if strict && !report.all_passed() {
        bail!("Preflight checks failed");
    }

    Ok(())
}
