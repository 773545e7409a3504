//! Core library components.
//!
//! This module contains the reusable signing logic: artifact selection,
//! template expansion, process execution and the pipeline that ties them
//! together.

pub mod artifact;
pub mod config;
pub mod constants;
pub mod context;
pub mod pipeline;
pub mod runner;
pub mod sign;
pub mod template;
pub mod types;

pub use artifact::{Artifact, ArtifactType, Artifacts, Filter};
pub use config::{Config, SigningGroup};
pub use context::Context;
pub use pipeline::{Outcome, Pipeline, Selection};
pub use runner::{Captured, Invocation, Runner, System};
pub use sign::Signer;
