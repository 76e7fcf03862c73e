// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage() {
    cli().exits_with(2).stderr_has("Usage:");
}

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("list-jobs")
        .stdout_has("show-job")
        .stdout_has("upload-local")
        .stdout_has("upload-remote");
}

#[test]
fn help_shows_short_aliases() {
    cli().args(&["--help"]).passes().stdout_has("list").stdout_has("show");
}

#[test]
fn upload_local_help_shows_listen_flags() {
    cli()
        .args(&["upload-local", "--help"])
        .passes()
        .stdout_has("--listen-addr")
        .stdout_has("--listen-port")
        .stdout_has("8899");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn help_lists_completion() {
    cli().args(&["--help"]).passes().stdout_has("completion");
}

#[test]
fn completion_prints_bash_script() {
    cli()
        .args(&["completion", "bash"])
        .passes()
        .stdout_has("cdtool")
        .stdout_has("upload-local");
}

#[test]
fn completion_rejects_unknown_shell() {
    cli().args(&["completion", "tcsh"]).exits_with(2).stderr_has("invalid value");
}
