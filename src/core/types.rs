//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

/// Key/value variables visible to templates (`$NAME` and `{{ .Env.NAME }}`).
///
/// Ordered so that logs and error messages are deterministic.
pub type Env = BTreeMap<String, String>;

/// Top-level template fields such as `ProjectName` or `Version`.
pub type Fields = BTreeMap<String, String>;

/// A signing group identifier, as configured in `signs[].id`.
pub type GroupId = String;

/// An artifact identifier (the build or archive ID that produced it).
pub type ArtifactId = String;
