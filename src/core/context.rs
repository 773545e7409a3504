//! Pipeline context.
//!
//! Everything a signing run reads besides the groups and artifacts: the
//! environment visible to templates, top-level template fields, and the
//! global skip switch.

use crate::core::types::{Env, Fields};

/// Shared state for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Environment variables visible to templates.
    pub env: Env,
    /// Top-level template fields (`ProjectName`, `Version`, `Tag`).
    pub fields: Fields,
    /// Skip signing entirely.
    pub skip_sign: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable, replacing any previous value.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add a top-level template field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_skip_sign(mut self, skip: bool) -> Self {
        self.skip_sign = skip;
        self
    }
}
