// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::CommandFactory;
use std::time::Duration;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("cdtool").chain(args.iter().copied()))
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[yare::parameterized(
    full_name = { "list-jobs" },
    alias     = { "list" },
)]
fn list_jobs_and_alias(verb: &str) {
    let cli = parse(&[verb, "--all"]).unwrap();
    assert!(matches!(cli.command, Commands::ListJobs(list::ListArgs { all: true })));
}

#[test]
fn show_alias_takes_optional_name() {
    let cli = parse(&["show", "-n", "build"]).unwrap();
    let Commands::ShowJob(args) = cli.command else { panic!("expected show-job") };
    assert_eq!(args.name, None);
    assert_eq!(args.namespace.as_deref(), Some("build"));
}

#[test]
fn upload_local_defaults_port() {
    let cli = parse(&["upload-local", "./disk.img", "myreg/img:v1", "--listen-addr", "10.0.0.5"])
        .unwrap();
    let Commands::UploadLocal(args) = cli.command else { panic!("expected upload-local") };
    assert_eq!(args.listen_port, upload::DEFAULT_LISTEN_PORT);
    assert_eq!(args.listen_addr.to_string(), "10.0.0.5");
}

#[test]
fn upload_local_requires_listen_addr() {
    let err = parse(&["upload-local", "./disk.img", "myreg/img:v1"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn upload_local_rejects_bad_address() {
    let err = parse(&["upload-local", "./disk.img", "t", "--listen-addr", "not-an-ip"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn upload_remote_with_wait_and_timeout() {
    let cli = parse(&[
        "upload-remote",
        "https://example.com/disk.img",
        "myreg/img:v1",
        "--wait",
        "--timeout",
        "10m",
        "--namespace",
        "build",
    ])
    .unwrap();
    let Commands::UploadRemote(args) = cli.command else { panic!("expected upload-remote") };
    assert!(args.wait);
    assert_eq!(args.job.timeout, Some(Duration::from_secs(600)));
    assert_eq!(args.to_request().namespace, "build");
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli = parse(&["list", "-o", "json", "-vv", "--kubeconfig", "/tmp/kc"]).unwrap();
    assert_eq!(cli.output, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.kubeconfig, Some(PathBuf::from("/tmp/kc")));
}

#[tokio::test]
async fn empty_tag_fails_before_connecting() {
    let cli = parse(&[
        "upload-remote",
        "https://example.com/disk.img",
        "",
        "--kubeconfig",
        "/nonexistent/kubeconfig",
    ])
    .unwrap();
    let err = run(cli, &CancellationToken::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "tag is not specified");
}

#[tokio::test]
async fn interrupted_run_exits_130() {
    let cli = parse(&["list-jobs", "--kubeconfig", "/nonexistent/kubeconfig"]).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = run_interruptible(cli, &cancel).await.unwrap_err();
    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, exit_error::INTERRUPTED);
}

#[tokio::test]
async fn uninterrupted_run_returns_its_own_error() {
    let cli = parse(&["list-jobs", "--kubeconfig", "/nonexistent/kubeconfig"]).unwrap();

    let err = run_interruptible(cli, &CancellationToken::new()).await.unwrap_err();
    assert!(err.downcast_ref::<ExitError>().is_none());
    assert!(err.to_string().contains("/nonexistent/kubeconfig"), "{err}");
}

#[test]
fn completion_takes_a_shell() {
    let cli = parse(&["completion", "zsh"]).unwrap();
    let Commands::Completion(args) = cli.command else { panic!("expected completion") };
    assert_eq!(args.shell, clap_complete::Shell::Zsh);
}
