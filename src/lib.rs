//! Signet - detached signatures for release artifacts.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── sign          # Run the signing pipeline over a manifest
//! │   ├── check         # Validate signet.toml
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── artifact      # Artifact inventory, filters, JSON manifest
//!     ├── config        # signet.toml, group defaults and validation
//!     ├── context       # Environment and template fields for a run
//!     ├── template      # $var and {{ }} expansion
//!     ├── runner/       # Process execution
//!     │   ├── mod       # Runner trait
//!     │   └── system    # std::process implementation
//!     ├── sign          # Sign one artifact
//!     └── pipeline      # Groups x artifacts, fail-fast
//! ```
//!
//! # Example
//!
//! ```no_run
//! use signet::core::{Artifact, ArtifactType, Artifacts, Context, Pipeline, SigningGroup, System};
//!
//! let mut store = Artifacts::new();
//! store.add(Artifact::new("app.tar.gz", "dist/app.tar.gz", ArtifactType::UploadableArchive));
//!
//! let mut groups = vec![SigningGroup {
//!     artifacts: "archive".to_string(),
//!     ..SigningGroup::default()
//! }];
//! signet::core::config::apply_defaults(&mut groups);
//!
//! let outcome = Pipeline::new(System).run(&Context::new(), &groups, &mut store)?;
//! println!("{}", outcome);
//! # Ok::<(), signet::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
