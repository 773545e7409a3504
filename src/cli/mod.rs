//! Command-line interface.

pub mod check;
pub mod completions;
pub mod output;
pub mod sign;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::constants;

/// Signet - detached signatures for release artifacts.
#[derive(Parser)]
#[command(
    name = "signet",
    about = "Detached signatures for release artifacts",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Sign the artifacts listed in the manifest
    Sign {
        /// Path to the signet config
        #[arg(short, long, default_value = constants::CONFIG_FILE)]
        config: PathBuf,
        /// Path to the artifact manifest (updated in place)
        #[arg(short, long, default_value = constants::MANIFEST_FILE)]
        manifest: PathBuf,
        /// Skip signing entirely
        #[arg(long, env = "SIGNET_SKIP_SIGN")]
        skip_sign: bool,
        /// Extra KEY=VALUE template variables
        #[arg(short, long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },

    /// Validate the signet config
    Check {
        /// Path to the signet config
        #[arg(short, long, default_value = constants::CONFIG_FILE)]
        config: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    match command {
        Command::Sign {
            config,
            manifest,
            skip_sign,
            env,
        } => sign::execute(&config, &manifest, skip_sign, &env),
        Command::Check { config } => check::execute(&config),
        Command::Completions { shell } => completions::execute(shell),
    }
}
