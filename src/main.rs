//! Signet - detached signatures for release artifacts.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use signet::cli::output;
use signet::cli::{execute, Cli};
use signet::core::constants;
use signet::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("signet=debug")
        } else {
            EnvFilter::new("signet=warn")
        }
    });

    // SIGNET_LOG_FORMAT=json swaps the human layer for one JSON object per line
    let json = std::env::var(constants::LOG_FORMAT_ENV)
        .is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let (human, machine) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        let layer = fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(human)
        .with(machine)
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => Some("create signet.toml or pass --config"),
            Error::Config(ConfigError::DuplicateId { .. })
            | Error::Config(ConfigError::InvalidArtifacts(_)) => Some("run: signet check"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
