//! Runner backed by `std::process::Command`.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};
use wait_timeout::ChildExt;

use super::{Captured, Invocation, Runner};
use crate::error::ProcessError;

/// Runs commands on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl System {
    /// Bare names go through a PATH lookup; anything with a separator is
    /// used as given.
    fn resolve(program: &str) -> Result<PathBuf, ProcessError> {
        if program.contains('/') || program.contains(std::path::MAIN_SEPARATOR) {
            return Ok(PathBuf::from(program));
        }
        which::which(program).map_err(|source| ProcessError::NotFound {
            program: program.to_string(),
            source,
        })
    }
}

impl Runner for System {
    fn run(&self, invocation: &Invocation) -> Result<Captured, ProcessError> {
        let program = Self::resolve(&invocation.program)?;
        trace!(program = %program.display(), args = ?invocation.args, "spawning");

        let stdin = if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(&program)
            .args(&invocation.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ProcessError::Spawn)?;

        let combined = Arc::new(Mutex::new(Vec::new()));
        let readers = [
            child.stdout.take().map(|out| drain(out, Arc::clone(&combined))),
            child.stderr.take().map(|err| drain(err, Arc::clone(&combined))),
        ];

        // Written from its own thread: a child may fill its output pipes
        // before it reads stdin.
        let writer = match (child.stdin.take(), &invocation.stdin) {
            (Some(mut pipe), Some(payload)) => {
                let payload = payload.clone();
                Some(thread::spawn(move || pipe.write_all(&payload)))
            }
            _ => None,
        };

        let Some(status) = wait(&mut child, invocation.timeout)? else {
            // Anything the child spawned may still hold the pipes open, so
            // the readers are left behind and the output so far is returned.
            return Err(ProcessError::Timeout {
                after: invocation.timeout.unwrap_or_default(),
                output: snapshot(&combined),
            });
        };

        for reader in readers.into_iter().flatten() {
            let _ = reader.join();
        }
        if let Some(writer) = writer {
            if let Ok(Err(e)) = writer.join() {
                // A signer may exit without reading its stdin.
                if e.kind() != io::ErrorKind::BrokenPipe {
                    debug!(error = %e, "failed to write stdin");
                }
            }
        }

        if status.success() {
            let output = combined.lock().map(|buf| buf.clone()).unwrap_or_default();
            return Ok(Captured { output });
        }
        Err(ProcessError::Exit {
            status,
            output: snapshot(&combined),
        })
    }
}

/// Wait for `child`. Returns `None` if it had to be killed at the deadline.
fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    if let Some(status) = child.wait_timeout(timeout)? {
        return Ok(Some(status));
    }

    debug!(pid = child.id(), "deadline passed, killing signer");
    // The child may exit on its own between the wait and the kill.
    let _ = child.kill();
    child.wait()?;
    Ok(None)
}

fn snapshot(combined: &Mutex<Vec<u8>>) -> String {
    combined
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

/// Copy everything from `source` into `sink` until EOF.
fn drain<R>(mut source: R, sink: Arc<Mutex<Vec<u8>>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if let Ok(mut out) = sink.lock() {
                        out.extend_from_slice(&buf[..n]);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    })
}
