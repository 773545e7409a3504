//! Error types.
//!
//! Each subsystem owns a focused error enum; [`Error`] wraps them so callers
//! can propagate with `?` and still match on the specific failure.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Configuration errors. All of them abort before any signer runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("found {count} signs with the ID '{id}', please fix your config")]
    DuplicateId { id: String, count: usize },

    #[error("invalid list of artifacts to sign: {0}")]
    InvalidArtifacts(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Failures while signing a single artifact.
#[derive(Error, Debug)]
pub enum SignError {
    #[error("sign failed: {artifact}: {source}")]
    Signature {
        artifact: String,
        #[source]
        source: TemplateError,
    },

    #[error("sign failed: {arg}: {source}")]
    Arg {
        arg: String,
        #[source]
        source: TemplateError,
    },

    #[error("sign failed: stdin: {0}")]
    Stdin(#[source] TemplateError),

    #[error("sign failed: cannot open file {}: {source}", .path.display())]
    StdinFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sign: {cmd} failed: {source}")]
    Process {
        cmd: String,
        #[source]
        source: ProcessError,
    },
}

/// Failures of the external signing process.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("executable file not found in $PATH: {program}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("{0}")]
    Spawn(#[source] std::io::Error),

    #[error("{status}: {output}")]
    Exit { status: ExitStatus, output: String },

    #[error("timed out after {}s: {output}", .after.as_secs())]
    Timeout { after: Duration, output: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A template that failed to parse or render.
///
/// The message always starts with `invalid template`, followed by the line
/// of the offending action and the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid template: tmpl:{line}: {reason}")]
pub struct TemplateError {
    pub line: usize,
    pub reason: TemplateReason,
}

/// Why a template was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateReason {
    #[error("unclosed action")]
    UnclosedAction,

    #[error("missing value for command")]
    EmptyAction,

    #[error("unexpected {0:?} in operand")]
    UnexpectedChar(char),

    #[error("unterminated quoted string")]
    UnterminatedString,

    #[error("function {0:?} not defined")]
    UnknownFunction(String),

    #[error("wrong number of args for {0}")]
    WrongArgs(String),

    #[error("can't give argument to non-function {0}")]
    NotAFunction(String),

    #[error("can't evaluate field {0}")]
    UnknownField(String),

    #[error("map has no entry for key {0:?}")]
    MissingKey(String),
}

/// Errors reading or writing the artifact manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write manifest {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
