//! Test fixtures and constants.

use std::path::Path;

use signet::core::{Artifact, ArtifactType, Artifacts};

/// Files created by [`release_artifacts`], relative to `dist/`.
pub const RELEASE_FILES: &[&str] = &[
    "artifact1",
    "artifact2",
    "artifact3",
    "checksum",
    "checksum2",
    "linux_amd64/artifact4",
    "artifact5.tar.gz",
    "package1.deb",
];

/// Signature paths for every artifact selected by `artifacts = "all"`.
pub const ALL_SIGNATURE_PATHS: &[&str] = &[
    "artifact1.sig",
    "artifact2.sig",
    "artifact3.sig",
    "checksum.sig",
    "checksum2.sig",
    "linux_amd64/artifact4.sig",
    "artifact5.tar.gz.sig",
    "package1.deb.sig",
];

/// Signature names for every artifact selected by `artifacts = "all"`.
pub const ALL_SIGNATURE_NAMES: &[&str] = &[
    "artifact1.sig",
    "artifact2.sig",
    "artifact3_1.0.0_linux_amd64.sig",
    "checksum.sig",
    "checksum2.sig",
    "artifact4_1.0.0_linux_amd64.sig",
    "artifact5.tar.gz.sig",
    "package1.deb.sig",
];

/// Create the standard release under `dist` and describe it.
///
/// Two archives, two binaries (one in a subdirectory, both with names that
/// differ from their file names), two checksums, a source archive and a
/// linux package.
pub fn release_artifacts(dist: &Path) -> Artifacts {
    std::fs::create_dir_all(dist.join("linux_amd64")).expect("failed to create dist dirs");
    for file in RELEASE_FILES {
        std::fs::write(dist.join(file), "foo").expect("failed to write artifact");
    }

    [
        Artifact::new("artifact1", dist.join("artifact1"), ArtifactType::UploadableArchive)
            .with_id("foo"),
        Artifact::new("artifact2", dist.join("artifact2"), ArtifactType::UploadableArchive)
            .with_id("foo3"),
        Artifact::new(
            "artifact3_1.0.0_linux_amd64",
            dist.join("artifact3"),
            ArtifactType::UploadableBinary,
        )
        .with_id("foo"),
        Artifact::new("checksum", dist.join("checksum"), ArtifactType::Checksum),
        Artifact::new("checksum2", dist.join("checksum2"), ArtifactType::Checksum),
        Artifact::new(
            "artifact4_1.0.0_linux_amd64",
            dist.join("linux_amd64").join("artifact4"),
            ArtifactType::UploadableBinary,
        )
        .with_id("foo3"),
        Artifact::new(
            "artifact5.tar.gz",
            dist.join("artifact5.tar.gz"),
            ArtifactType::UploadableSourceArchive,
        ),
        Artifact::new("package1.deb", dist.join("package1.deb"), ArtifactType::LinuxPackage)
            .with_id("foo"),
    ]
    .into_iter()
    .collect()
}

/// Config signing checksums with `touch` as a stand-in signer.
pub const TOUCH_CHECKSUMS_CONFIG: &str = r#"
[[signs]]
cmd = "touch"
args = ["$signature"]
artifacts = "checksum"
"#;

/// Config signing everything with `touch` as a stand-in signer.
pub const TOUCH_ALL_CONFIG: &str = r#"
[[signs]]
cmd = "touch"
args = ["${signature}"]
artifacts = "all"
"#;
