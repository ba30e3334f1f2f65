//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Run the full packaging pipeline
//! - `spec` - Stage files and write the descriptor only
//! - `show` - Display the resolved definition or the staged tree
//! - `clean` - Remove staging roots
//! - `preflight` - Run host checks before a build

pub mod build;
pub mod clean;
mod preflight;
pub mod show;
pub mod spec;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
pub use spec::cmd_spec;
