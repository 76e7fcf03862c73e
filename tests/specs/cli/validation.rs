// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input errors are reported before any cluster call.

use crate::prelude::*;

#[test]
fn empty_tag_is_rejected() {
    cli()
        .args(&["upload-remote", "https://example.com/disk.img", ""])
        .exits_with(1)
        .stderr_has("error: tag is not specified")
        .stdout_is_empty();
}

#[test]
fn empty_source_is_rejected() {
    cli()
        .args(&["upload-remote", "", "myreg/img:v1"])
        .exits_with(1)
        .stderr_has("error: image source is not specified");
}

#[test]
fn blank_namespace_is_rejected() {
    cli()
        .args(&["upload-remote", "https://example.com/disk.img", "myreg/img:v1", "-n", " "])
        .exits_with(1)
        .stderr_has("error: namespace is not specified");
}

#[test]
fn upload_local_requires_listen_addr() {
    cli()
        .args(&["upload-local", "./disk.img", "myreg/img:v1"])
        .exits_with(2)
        .stderr_has("--listen-addr");
}

#[test]
fn upload_local_empty_tag_is_rejected() {
    cli()
        .args(&["upload-local", "./disk.img", "", "--listen-addr", "127.0.0.1"])
        .exits_with(1)
        .stderr_has("error: tag is not specified");
}

#[test]
fn bad_timeout_is_a_usage_error() {
    cli()
        .args(&["upload-remote", "https://example.com/disk.img", "t", "--wait", "--timeout", "5d"])
        .exits_with(2)
        .stderr_has("unknown duration unit");
}

#[test]
fn unknown_output_format_is_a_usage_error() {
    cli().args(&["list-jobs", "-o", "yaml"]).exits_with(2).stderr_has("yaml");
}

#[test]
fn unreadable_kubeconfig_fails_cleanly() {
    cli()
        .args(&["list-jobs", "--kubeconfig", "/nonexistent/cdtool-specs/kc.yaml"])
        .exits_with(1)
        .stderr_has("error: failed to build cluster client");
}
