// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for running the `cdtool` binary.

use assert_cmd::Command;

/// A `cdtool` invocation isolated from the caller's cluster config.
pub fn cli() -> CliRun {
    let mut cmd = Command::cargo_bin("cdtool").unwrap();
    cmd.env("KUBECONFIG", "/nonexistent/cdtool-specs/kubeconfig")
        .env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("RUST_LOG")
        .env_remove("CDTOOL_NAMESPACE");
    CliRun { cmd }
}

pub struct CliRun {
    cmd: Command,
}

impl CliRun {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require exit status 0.
    pub fn passes(self) -> RunOutput {
        let out = self.run();
        assert_eq!(out.code, Some(0), "expected success\nstdout: {}\nstderr: {}", out.stdout, out.stderr);
        out
    }

    /// Run and require exit status `code`.
    pub fn exits_with(self, code: i32) -> RunOutput {
        let out = self.run();
        assert_eq!(out.code, Some(code), "stdout: {}\nstderr: {}", out.stdout, out.stderr);
        out
    }

    fn run(mut self) -> RunOutput {
        let output = self.cmd.output().unwrap();
        RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}:\n{}", needle, self.stderr);
        self
    }

    pub fn stdout_is_empty(self) -> Self {
        assert!(self.stdout.is_empty(), "expected no stdout, got:\n{}", self.stdout);
        self
    }
}
