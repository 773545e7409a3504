//! Artifact inventory.
//!
//! Holds every artifact produced by the release pipeline, supports typed
//! filtering, and persists to a JSON manifest so separate pipeline stages
//! can hand the list to each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::types::ArtifactId;
use crate::error::{ManifestError, Result};

/// Kind of build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// A compiled binary that is only an intermediate build product.
    Binary,
    /// An archive meant to be uploaded to a release.
    UploadableArchive,
    /// A binary meant to be uploaded as-is.
    UploadableBinary,
    /// A source archive of the tagged tree.
    UploadableSourceArchive,
    /// A `.deb`, `.rpm` or similar system package.
    LinuxPackage,
    /// A checksums file.
    Checksum,
    /// A detached signature.
    Signature,
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactType::Binary => "binary",
            ArtifactType::UploadableArchive => "archive",
            ArtifactType::UploadableBinary => "uploadable binary",
            ArtifactType::UploadableSourceArchive => "source archive",
            ArtifactType::LinuxPackage => "linux package",
            ArtifactType::Checksum => "checksum",
            ArtifactType::Signature => "signature",
        };
        f.write_str(name)
    }
}

/// A single build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Display and upload name.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    /// ID of the build that produced the artifact, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ArtifactId>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: ArtifactType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            id: None,
        }
    }

    /// Set the artifact's ID.
    pub fn with_id(mut self, id: impl Into<ArtifactId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The ID, or an empty string when unset.
    pub fn id_or_default(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Predicate over artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    ByType(ArtifactType),
    /// Matches artifacts whose ID is in the list. Checksums and source
    /// archives always match: they cover every build, not one.
    ByIds(Vec<ArtifactId>),
    Or(Vec<Filter>),
    And(Vec<Filter>),
}

impl Filter {
    /// Match any of the given types.
    pub fn by_types(types: &[ArtifactType]) -> Self {
        Filter::Or(types.iter().copied().map(Filter::ByType).collect())
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        match self {
            Filter::ByType(kind) => artifact.kind == *kind,
            Filter::ByIds(ids) => {
                matches!(
                    artifact.kind,
                    ArtifactType::Checksum | ArtifactType::UploadableSourceArchive
                ) || ids.iter().any(|id| artifact.id.as_ref() == Some(id))
            }
            Filter::Or(filters) => filters.iter().any(|f| f.matches(artifact)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(artifact)),
        }
    }
}

/// Ordered artifact collection. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifacts {
    items: Vec<Artifact>,
}

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact.
    pub fn add(&mut self, artifact: Artifact) {
        debug!(name = %artifact.name, kind = %artifact.kind, "adding artifact");
        self.items.push(artifact);
    }

    pub fn list(&self) -> &[Artifact] {
        &self.items
    }

    /// Artifacts matching `filter`, in insertion order.
    pub fn filter(&self, filter: &Filter) -> Vec<&Artifact> {
        self.items.iter().filter(|a| filter.matches(a)).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load a manifest written by [`Artifacts::save`].
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Read` or `ManifestError::Parse`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading artifact manifest");

        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let artifacts: Self =
            serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(artifacts = artifacts.len(), "manifest loaded");
        Ok(artifacts)
    }

    /// Write the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Serialize` or `ManifestError::Write`.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), artifacts = self.len(), "saving artifact manifest");

        let mut contents = serde_json::to_string_pretty(self).map_err(ManifestError::Serialize)?;
        contents.push('\n');
        std::fs::write(path, contents).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

impl FromIterator<Artifact> for Artifacts {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
