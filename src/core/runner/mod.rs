//! External process execution.
//!
//! The signer never spawns processes directly; it hands an [`Invocation`] to
//! a [`Runner`]. [`System`] runs real commands, and tests plug in fakes.
//!
//! ## Adding a New Runner
//!
//! 1. Implement the `Runner` trait
//! 2. Return the combined stdout and stderr in [`Captured`]
//! 3. Map failures onto [`ProcessError`] so sign errors stay uniform

use std::time::Duration;
use zeroize::Zeroizing;

use crate::error::ProcessError;

mod system;

pub use system::System;

/// A fully expanded command line.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    pub args: Vec<String>,
    /// Bytes piped to the child's stdin. Usually a passphrase, so the
    /// buffer is wiped on drop.
    pub stdin: Option<Zeroizing<Vec<u8>>>,
    /// Kill the child once this much time has passed.
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            ..Self::default()
        }
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Stdout and stderr, interleaved in arrival order.
    pub output: Vec<u8>,
}

impl Captured {
    /// Output as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Process execution capability.
pub trait Runner {
    /// Run `invocation` to completion.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::NotFound` or `ProcessError::Spawn` when the
    /// command can't start, `ProcessError::Exit` on a non-zero exit and
    /// `ProcessError::Timeout` when the deadline passes. The last two carry
    /// the captured output.
    fn run(&self, invocation: &Invocation) -> Result<Captured, ProcessError>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, invocation: &Invocation) -> Result<Captured, ProcessError> {
        (**self).run(invocation)
    }
}

impl<R: Runner + ?Sized> Runner for Box<R> {
    fn run(&self, invocation: &Invocation) -> Result<Captured, ProcessError> {
        (**self).run(invocation)
    }
}
