//! Signing pipeline.
//!
//! Runs every signing group, in order, over the artifacts it selects. The
//! run is fail-fast: the first error stops it, and signatures inserted
//! before that point stay in the store.

use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::core::artifact::{Artifact, ArtifactType, Artifacts, Filter};
use crate::core::config::{self, SigningGroup};
use crate::core::context::Context;
use crate::core::runner::Runner;
use crate::core::sign::Signer;
use crate::error::{ConfigError, Error, Result};

/// Which artifacts a group signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    None,
    All,
    Archive,
    Binary,
    Package,
    Checksum,
    Source,
}

impl Selection {
    /// Type filter for this selection, or `None` when nothing is signed.
    pub fn filter(self) -> Option<Filter> {
        use ArtifactType::*;

        let types: &[ArtifactType] = match self {
            Selection::None => return None,
            Selection::All => &[
                UploadableArchive,
                UploadableBinary,
                UploadableSourceArchive,
                Checksum,
                LinuxPackage,
            ],
            Selection::Archive => &[UploadableArchive],
            Selection::Binary => &[UploadableBinary],
            Selection::Package => &[LinuxPackage],
            Selection::Checksum => &[Checksum],
            Selection::Source => &[UploadableSourceArchive],
        };
        Some(Filter::by_types(types))
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// An empty string is the default selection, `none`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "none" => Ok(Selection::None),
            "all" => Ok(Selection::All),
            "archive" => Ok(Selection::Archive),
            "binary" => Ok(Selection::Binary),
            "package" => Ok(Selection::Package),
            "checksum" => Ok(Selection::Checksum),
            "source" => Ok(Selection::Source),
            other => Err(ConfigError::InvalidArtifacts(other.to_string()).into()),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selection::None => "none",
            Selection::All => "all",
            Selection::Archive => "archive",
            Selection::Binary => "binary",
            Selection::Package => "package",
            Selection::Checksum => "checksum",
            Selection::Source => "source",
        };
        f.write_str(name)
    }
}

/// Filter for `group`: its selection, narrowed by `ids` when set.
pub fn group_filter(group: &SigningGroup, selection: Selection) -> Option<Filter> {
    let by_type = selection.filter()?;
    if group.ids.is_empty() {
        return Some(by_type);
    }
    Some(Filter::And(vec![by_type, Filter::ByIds(group.ids.clone())]))
}

/// Result of a run that didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Signing is turned off: skip flag set, no groups, or nothing selected.
    Disabled,
    /// Every selected artifact was signed.
    Completed {
        /// Signatures inserted into the store, in the order they were made.
        signatures: Vec<Artifact>,
    },
}

impl Outcome {
    /// Number of signatures produced.
    pub fn signed(&self) -> usize {
        match self {
            Outcome::Disabled => 0,
            Outcome::Completed { signatures } => signatures.len(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Disabled => f.write_str("artifact signing is disabled"),
            Outcome::Completed { signatures } => {
                write!(f, "signed {} artifact(s)", signatures.len())
            }
        }
    }
}

/// Drives signing groups over the artifact store.
#[derive(Debug, Clone)]
pub struct Pipeline<R> {
    signer: Signer<R>,
}

impl<R: Runner> Pipeline<R> {
    pub fn new(runner: R) -> Self {
        Self {
            signer: Signer::new(runner),
        }
    }

    pub fn signer(&self) -> &Signer<R> {
        &self.signer
    }

    /// Sign the artifacts selected by each group and add the signatures to
    /// `store`.
    ///
    /// Groups are validated, and every `artifacts` value parsed, before any
    /// signer runs.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` or `SignError` encountered.
    pub fn run(
        &self,
        ctx: &Context,
        groups: &[SigningGroup],
        store: &mut Artifacts,
    ) -> Result<Outcome> {
        if config::should_skip(groups, ctx.skip_sign) {
            debug!(skip_sign = ctx.skip_sign, signs = groups.len(), "signing disabled");
            return Ok(Outcome::Disabled);
        }

        config::validate(groups)?;
        let selections = groups
            .iter()
            .map(|g| g.artifacts.parse::<Selection>())
            .collect::<Result<Vec<_>>>()?;

        let mut signatures = Vec::new();
        for (group, selection) in groups.iter().zip(selections) {
            let Some(filter) = group_filter(group, selection) else {
                debug!(id = %group.id, "group selects nothing, skipping");
                continue;
            };

            let targets: Vec<Artifact> = store.filter(&filter).into_iter().cloned().collect();
            debug!(
                id = %group.id,
                selection = %selection,
                ids = ?group.ids,
                targets = targets.len(),
                "signing group"
            );

            for artifact in &targets {
                let signature = self.signer.sign(ctx, group, artifact)?;
                store.add(signature.clone());
                signatures.push(signature);
            }
        }

        info!(signatures = signatures.len(), "signing complete");
        Ok(Outcome::Completed { signatures })
    }
}
