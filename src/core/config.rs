//! Configuration file management.
//!
//! Handles reading `signet.toml`, filling signing-group defaults, and
//! validating the groups before any signer runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::constants;
use crate::core::context::Context;
use crate::core::types::{ArtifactId, Env, GroupId};
use crate::error::{ConfigError, Result};

/// Project configuration stored in `signet.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exposed to templates as `{{ .ProjectName }}`.
    pub project_name: String,
    /// Exposed to templates as `{{ .Version }}`.
    pub version: String,
    /// Exposed to templates as `{{ .Tag }}`.
    pub tag: String,
    /// Extra `KEY=VALUE` environment entries, layered over the process env.
    pub env: Vec<String>,
    /// Signing groups, in the order they run.
    pub signs: Vec<SigningGroup>,
}

/// One configured signing unit.
///
/// Empty strings and lists mean "unset" and are filled by [`apply_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningGroup {
    pub id: GroupId,
    pub cmd: String,
    pub args: Vec<String>,
    pub signature: String,
    /// Which artifacts to sign: `none`, `all`, `archive`, `binary`,
    /// `package`, `checksum` or `source`. Checked when the pipeline runs.
    pub artifacts: String,
    pub ids: Vec<ArtifactId>,
    /// Templated payload piped to the signer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
    /// File piped verbatim to the signer. Takes precedence over `stdin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin_file: Option<PathBuf>,
    /// Kill the signer after this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Load, default and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        apply_defaults(&mut config.signs);
        validate(&config.signs)?;

        debug!(signs = config.signs.len(), "config loaded");
        Ok(config)
    }

    /// Build the run context: the process environment overlaid with the
    /// configured `env` entries, plus the project template fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an `env` entry without `=`.
    pub fn context(&self, skip_sign: bool) -> Result<Context> {
        // Non UTF-8 variables can't be referenced from templates anyway.
        let process_env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        let mut ctx = Context {
            env: process_env.collect(),
            ..Context::default()
        }
        .with_skip_sign(skip_sign);

        for (key, value) in parse_env(&self.env)? {
            ctx.env.insert(key, value);
        }

        for (field, value) in [
            (constants::FIELD_PROJECT_NAME, &self.project_name),
            (constants::FIELD_VERSION, &self.version),
            (constants::FIELD_TAG, &self.tag),
        ] {
            ctx.fields.insert(field.to_string(), value.clone());
        }

        Ok(ctx)
    }
}

/// Parse `KEY=VALUE` entries.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an entry without `=` or with an
/// empty key.
pub fn parse_env(entries: &[String]) -> Result<Env> {
    let mut env = Env::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                env.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "env",
                    reason: format!("expected KEY=VALUE, got '{}'", entry),
                }
                .into())
            }
        }
    }
    Ok(env)
}

/// Fill unset fields of every group with the defaults.
///
/// Explicit values are left alone, so applying twice is the same as once.
pub fn apply_defaults(groups: &mut [SigningGroup]) {
    for group in groups {
        if group.cmd.is_empty() {
            group.cmd = constants::DEFAULT_CMD.to_string();
        }
        if group.signature.is_empty() {
            group.signature = constants::DEFAULT_SIGNATURE.to_string();
        }
        if group.args.is_empty() {
            group.args = constants::DEFAULT_ARGS
                .iter()
                .map(|a| a.to_string())
                .collect();
        }
        if group.artifacts.is_empty() {
            group.artifacts = constants::DEFAULT_ARTIFACTS.to_string();
        }
    }
}

/// Check that no two groups share a non-empty ID.
///
/// # Errors
///
/// Returns `ConfigError::DuplicateId` naming the first duplicated ID (in
/// sorted order) and how many groups use it.
pub fn validate(groups: &[SigningGroup]) -> Result<()> {
    debug!(signs = groups.len(), "validating signing groups");

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for group in groups.iter().filter(|g| !g.id.is_empty()) {
        *counts.entry(group.id.as_str()).or_default() += 1;
    }
    if let Some((id, count)) = counts.into_iter().find(|(_, count)| *count > 1) {
        return Err(ConfigError::DuplicateId {
            id: id.to_string(),
            count,
        }
        .into());
    }

    for group in groups {
        if group.stdin.is_some() && group.stdin_file.is_some() {
            warn!(id = %group.id, "both stdin and stdin_file set; stdin_file wins");
        }
    }

    Ok(())
}

/// Whether signing should be skipped altogether.
///
/// An unset `artifacts` counts as its default, `none`.
pub fn should_skip(groups: &[SigningGroup], skip_sign: bool) -> bool {
    skip_sign
        || groups.is_empty()
        || groups
            .iter()
            .all(|g| g.artifacts.is_empty() || g.artifacts == constants::DEFAULT_ARTIFACTS)
}
