//! Recording runner for library-level tests.
//!
//! Stands in for a real signer: it records each invocation and, like
//! `gpg --output <sig>`, writes the signature file named by the argument
//! after `--output` (or the only argument, when there is exactly one).

use std::sync::Mutex;

use signet::core::{Captured, Invocation, Runner};
use signet::error::ProcessError;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// Fake signer.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    /// Fail the call with this zero-based index.
    fail_on: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `index`-th call (zero-based) as `exit 1` would.
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Runner for Recorder {
    fn run(&self, invocation: &Invocation) -> Result<Captured, ProcessError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(Call {
            program: invocation.program.clone(),
            args: invocation.args.clone(),
            stdin: invocation.stdin.as_ref().map(|s| s.to_vec()),
        });

        if self.fail_on == Some(index) {
            return Err(ProcessError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "exit status: 1",
            )));
        }

        let output = match invocation.args.as_slice() {
            [single] => Some(single),
            args => args
                .iter()
                .position(|a| a == "--output")
                .and_then(|i| args.get(i + 1)),
        };
        if let Some(path) = output {
            std::fs::write(path, "signature").map_err(ProcessError::Io)?;
        }

        Ok(Captured::default())
    }
}
