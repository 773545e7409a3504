//! Constants used throughout signet.
//!
//! Centralizes magic strings and configuration defaults.

/// Configuration file name.
pub const CONFIG_FILE: &str = "signet.toml";

/// Default artifact manifest location.
pub const MANIFEST_FILE: &str = "dist/artifacts.json";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SIGNET_LOG";

/// Environment variable selecting the log format (`json` for JSON lines).
pub const LOG_FORMAT_ENV: &str = "SIGNET_LOG_FORMAT";

/// Default signing command.
pub const DEFAULT_CMD: &str = "gpg";

/// Default signature file template.
pub const DEFAULT_SIGNATURE: &str = "${artifact}.sig";

/// Default signing command arguments.
pub const DEFAULT_ARGS: &[&str] = &["--output", "$signature", "--detach-sig", "$artifact"];

/// Default artifact selection (signing disabled).
pub const DEFAULT_ARTIFACTS: &str = "none";

/// Template variable bound to the artifact path (or name, for the name pass).
pub const VAR_ARTIFACT: &str = "artifact";

/// Template variable bound to the artifact's `ID`.
pub const VAR_ARTIFACT_ID: &str = "artifactID";

/// Template variable bound to the expanded signature path.
pub const VAR_SIGNATURE: &str = "signature";

/// Template field names exposed from the project configuration.
pub const FIELD_PROJECT_NAME: &str = "ProjectName";
pub const FIELD_VERSION: &str = "Version";
pub const FIELD_TAG: &str = "Tag";
