//! Check command - validate the signet config without signing anything.

use std::path::Path;

use crate::cli::output;
use crate::core::config::{self, Config};
use crate::core::pipeline::Selection;
use crate::error::Result;

/// Load and validate the config, then summarize each signing group.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    for (index, group) in config.signs.iter().enumerate() {
        let selection: Selection = group.artifacts.parse()?;

        let title = if group.id.is_empty() {
            format!("sign #{}", index + 1)
        } else {
            format!("sign '{}'", group.id)
        };
        output::section(&title);
        output::kv("cmd", &group.cmd);
        output::kv("artifacts", selection);
        if !group.ids.is_empty() {
            output::kv("ids", group.ids.join(", "));
        }
        output::kv("signature", &group.signature);
        if let Some(path) = &group.stdin_file {
            output::kv("stdin", path.display());
        } else if group.stdin.is_some() {
            output::kv("stdin", "template");
        }
        if let Some(secs) = group.timeout {
            output::kv("timeout", format!("{}s", secs));
        }
    }

    println!();
    if config::should_skip(&config.signs, false) {
        output::warn("artifact signing is disabled");
    } else {
        output::success("config is valid");
    }

    Ok(())
}
