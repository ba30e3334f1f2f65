//! Preflight checks for packaging runs.
//!
//! Validates the host before a build: the packaging tool must be
//! resolvable, and the definition file must parse. Run with
//! `rpmforge preflight` to check everything is ready.

use std::path::Path;

use crate::config::{BuildDefinition, Env};
use crate::process::Cmd;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check failed - a build will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
}

impl CheckResult {
    fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let icon = match check.status {
                CheckStatus::Pass => "✓",
                CheckStatus::Fail => "✗",
                CheckStatus::Warn => "⚠",
            };
            match &check.details {
                Some(details) => println!("  {} {} - {}", icon, check.name, details),
                None => println!("  {} {}", icon, check.name),
            }
        }

        let failed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count();
        println!();
        if failed == 0 {
            println!("All checks passed.");
        } else {
            println!("{} check(s) failed.", failed);
        }
    }
}

/// Run every preflight check.
pub fn run_checks(env: &Env, definition_path: &Path) -> PreflightReport {
    let mut checks = Vec::new();
    checks.push(check_tool_resolvable(env));
    checks.push(check_tool_version(env));
    checks.push(check_definition(definition_path));
    PreflightReport { checks }
}

/// The packaging binary must be on PATH (bare name) or exist (explicit
/// path override).
fn check_tool_resolvable(env: &Env) -> CheckResult {
    let name = "packaging tool resolvable";
    let program = &env.rpmbuild;

    if program.components().count() > 1 {
        if program.is_file() {
            CheckResult::pass_with(name, &program.display().to_string())
        } else {
            CheckResult::fail(
                name,
                &format!("{} does not exist (RPMFORGE_RPMBUILD)", program.display()),
            )
        }
    } else {
        match which::which(program) {
            Ok(path) => CheckResult::pass_with(name, &path.display().to_string()),
            Err(_) => CheckResult::fail(
                name,
                &format!(
                    "{} not found on PATH. Install rpm-build, or point RPMFORGE_RPMBUILD at it.",
                    program.display()
                ),
            ),
        }
    }
}

/// A version probe confirms the tool actually executes.
fn check_tool_version(env: &Env) -> CheckResult {
    let name = "packaging tool runs";
    let result = Cmd::new(&env.rpmbuild).arg("--version").allow_fail().run();

    match result {
        Ok(result) if result.success() => {
            CheckResult::pass_with(name, result.stdout_trimmed())
        }
        Ok(result) => CheckResult::warn(
            name,
            &format!("--version exited with code {}", result.code()),
        ),
        Err(e) => CheckResult::fail(name, &format!("{:#}", e)),
    }
}

/// The definition file must exist and parse.
fn check_definition(path: &Path) -> CheckResult {
    let name = "definition file";

    if !path.exists() {
        return CheckResult::warn(
            name,
            &format!("{} not found (pass -f to point at one)", path.display()),
        );
    }

    match BuildDefinition::load(path) {
        Ok(definition) => CheckResult::pass_with(
            name,
            &format!(
                "{} ({} mapping(s))",
                path.display(),
                definition.files.len()
            ),
        ),
        Err(e) => CheckResult::fail(name, &format!("{:#}", e)),
    }
}
