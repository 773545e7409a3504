//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a signet command running in the project directory.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("signet").expect("failed to find signet binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("SIGNET_LOG");
        cmd.env_remove("SIGNET_LOG_FORMAT");
        cmd.env_remove("SIGNET_SKIP_SIGN");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Shortcut for `signet sign`.
    pub fn sign(&self) -> Output {
        self.cmd()
            .arg("sign")
            .output()
            .expect("failed to run signet sign")
    }

    /// Shortcut for `signet sign <args>`.
    pub fn sign_with(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("sign")
            .args(args)
            .output()
            .expect("failed to run signet sign")
    }

    /// Shortcut for `signet check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run signet check")
    }
}
