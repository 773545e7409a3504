//! Sign command.
//!
//! Loads the config and artifact manifest, runs the signing pipeline, and
//! writes the manifest back with the new signatures.

use std::path::Path;
use tracing::debug;

use crate::cli::output;
use crate::core::artifact::Artifacts;
use crate::core::config::{self, Config};
use crate::core::pipeline::{Outcome, Pipeline};
use crate::core::runner::System;
use crate::error::Result;

/// Run the signing pipeline.
pub fn execute(
    config_path: &Path,
    manifest: &Path,
    skip_sign: bool,
    env: &[String],
) -> Result<()> {
    let config = Config::load(config_path)?;
    let mut ctx = config.context(skip_sign)?;
    ctx.env.extend(config::parse_env(env)?);

    let mut store = Artifacts::load(manifest)?;
    let before = store.len();

    let outcome = match Pipeline::new(System).run(&ctx, &config.signs, &mut store) {
        Ok(outcome) => outcome,
        Err(e) => {
            // Signatures made before the failure exist on disk; keep them listed.
            if store.len() > before {
                debug!(added = store.len() - before, "saving partial manifest");
                store.save(manifest)?;
            }
            return Err(e);
        }
    };

    match &outcome {
        Outcome::Disabled => output::warn(&outcome.to_string()),
        Outcome::Completed { signatures } => {
            for signature in signatures {
                output::success(&format!(
                    "signed {}",
                    output::path(&signature.path.display().to_string())
                ));
            }
            store.save(manifest)?;
            output::kv("signatures", signatures.len());
            output::kv("manifest", manifest.display());
        }
    }

    Ok(())
}
