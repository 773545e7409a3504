//! Signing a single artifact.
//!
//! [`Signer::sign`] expands the group's templates for one artifact, runs the
//! signing command, and describes the signature it produced. It does not
//! touch the artifact store; the pipeline inserts the returned artifact.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::artifact::{Artifact, ArtifactType};
use crate::core::config::SigningGroup;
use crate::core::constants::{VAR_ARTIFACT, VAR_ARTIFACT_ID, VAR_SIGNATURE};
use crate::core::context::Context;
use crate::core::runner::{Invocation, Runner};
use crate::core::template::{self, Vars};
use crate::core::types::Env;
use crate::error::{Result, SignError, TemplateError};

/// Signs artifacts through a [`Runner`].
#[derive(Debug, Clone)]
pub struct Signer<R> {
    runner: R,
}

impl<R: Runner> Signer<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Sign `artifact` as configured by `group`.
    ///
    /// The signature path is `group.signature` expanded with `artifact` bound
    /// to the artifact's path; its name is the same template expanded with
    /// `artifact` bound to the artifact's name.
    ///
    /// # Errors
    ///
    /// Returns `SignError` when a template fails, the stdin file can't be
    /// read, or the signing command fails.
    pub fn sign(
        &self,
        ctx: &Context,
        group: &SigningGroup,
        artifact: &Artifact,
    ) -> Result<Artifact> {
        let mut env = ctx.env.clone();
        env.insert(
            VAR_ARTIFACT.to_string(),
            artifact.path.to_string_lossy().into_owned(),
        );
        env.insert(
            VAR_ARTIFACT_ID.to_string(),
            artifact.id_or_default().to_string(),
        );

        let signature_path =
            expand(ctx, &env, &group.signature).map_err(|source| SignError::Signature {
                artifact: artifact.name.clone(),
                source,
            })?;

        let mut name_env = env.clone();
        name_env.insert(VAR_ARTIFACT.to_string(), artifact.name.clone());
        let signature_name =
            expand(ctx, &name_env, &group.signature).map_err(|source| SignError::Signature {
                artifact: artifact.name.clone(),
                source,
            })?;

        env.insert(VAR_SIGNATURE.to_string(), signature_path.clone());

        let args = group
            .args
            .iter()
            .map(|arg| {
                expand(ctx, &env, arg).map_err(|source| SignError::Arg {
                    arg: arg.clone(),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let invocation = Invocation {
            program: group.cmd.clone(),
            args,
            stdin: stdin(ctx, &env, group)?,
            timeout: group.timeout.map(Duration::from_secs),
        };

        info!(cmd = %group.cmd, artifact = %artifact.name, "signing");
        let captured = self
            .runner
            .run(&invocation)
            .map_err(|source| SignError::Process {
                cmd: group.cmd.clone(),
                source,
            })?;
        if !captured.output.is_empty() {
            debug!(
                cmd = %group.cmd,
                artifact = %artifact.name,
                output = %captured.text(),
                "signer output"
            );
        }

        Ok(Artifact {
            name: signature_name,
            path: PathBuf::from(signature_path),
            kind: ArtifactType::Signature,
            id: artifact.id.clone(),
        })
    }
}

fn expand(ctx: &Context, env: &Env, src: &str) -> std::result::Result<String, TemplateError> {
    template::expand(src, &Vars::new(env, &ctx.fields))
}

/// Payload for the signer's stdin. A file is sent verbatim; a literal only
/// has its `{{ }}` actions rendered, so a `$` in a passphrase survives.
fn stdin(ctx: &Context, env: &Env, group: &SigningGroup) -> Result<Option<Zeroizing<Vec<u8>>>> {
    if let Some(path) = &group.stdin_file {
        let bytes = std::fs::read(path).map_err(|source| SignError::StdinFile {
            path: path.clone(),
            source,
        })?;
        return Ok(Some(Zeroizing::new(bytes)));
    }

    match &group.stdin {
        Some(literal) => {
            let vars = Vars::new(env, &ctx.fields);
            let expanded =
                Zeroizing::new(template::render(literal, &vars).map_err(SignError::Stdin)?);
            Ok(Some(Zeroizing::new(expanded.as_bytes().to_vec())))
        }
        None => Ok(None),
    }
}
