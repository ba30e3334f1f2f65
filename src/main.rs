//! Rpmforge - stages file trees into the rpmbuild layout, writes the spec
//! file, and builds the RPM package.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rpmforge::commands;

#[derive(Parser)]
#[command(name = "rpmforge")]
#[command(about = "Build RPM packages from staged file trees")]
#[command(
    after_help = "QUICK START:\n  rpmforge preflight  Check rpmbuild is available\n  rpmforge build      Stage files, write the spec, build the RPM\n  rpmforge spec       Stage files and write the spec only\n  rpmforge clean      Remove staging roots"
)]
struct Cli {
    /// Package definition file
    #[arg(short = 'f', long, default_value = "rpmforge.json", global = true)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage files, write the spec, and build the RPM
    Build {
        /// Copy the finished RPM into this directory
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Delete the staging root after a successful build
        #[arg(long)]
        discard_temp: bool,
    },

    /// Stage files and write the spec file, without building
    Spec,

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Remove staging roots (configured and generated)
    Clean,

    /// Run preflight checks (verify the host before a build)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show the resolved package definition
    Config,
    /// List the staged build-root tree
    Tree,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Build { dest, discard_temp } => {
            commands::cmd_build(&cli.file, dest, discard_temp)?;
        }

        Commands::Spec => {
            commands::cmd_spec(&cli.file)?;
        }

        Commands::Show { what } => {
            let target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Tree => commands::show::ShowTarget::Tree,
            };
            commands::cmd_show(&cli.file, target)?;
        }

        Commands::Clean => {
            commands::cmd_clean(&cli.file)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&cli.file, strict)?;
        }
    }

    Ok(())
}
