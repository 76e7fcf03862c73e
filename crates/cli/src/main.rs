// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cdtool - convert disk images into container images with Kubernetes jobs

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use cdtool_adapters::KubeJobStore;
use cdtool_core::OwnerLabel;
use cdtool_engine::{Scanner, Uploader};

use commands::{completion, list, show, upload};
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cdtool",
    version = env::VERSION,
    about = "Convert disk images into container images using Kubernetes jobs",
    styles = color::styles(),
)]
struct Cli {
    /// Path to the kubeconfig file [default: $KUBECONFIG or ~/.kube/config]
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List cdtool jobs in all namespaces
    #[command(visible_alias = "list")]
    ListJobs(list::ListArgs),
    /// Show source and tag of cdtool jobs in one namespace
    #[command(visible_alias = "show")]
    ShowJob(show::ShowArgs),
    /// Serve a local disk image and convert it; waits for the job to finish
    UploadLocal(upload::LocalArgs),
    /// Convert a disk image the cluster can download from a URL
    UploadRemote(upload::RemoteArgs),
    /// Print a shell completion script
    Completion(completion::CompletionArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {e}");
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, shutting down");
            interrupt.cancel();
        }
    });

    if let Err(e) = run_interruptible(cli, &cancel).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("error: {}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("error: {}", e);
        std::process::exit(exit_error::FAILURE);
    }
}

/// How long in-flight work gets to wind down after Ctrl-C.
const INTERRUPT_GRACE: Duration = Duration::from_secs(2);

/// Run the command, abandoning it when interrupted.
///
/// Waits react to the token themselves; anything still running once the
/// grace period ends is dropped, which stops and removes a local file server.
async fn run_interruptible(cli: Cli, cancel: &CancellationToken) -> Result<()> {
    let work = run(cli, cancel);
    tokio::pin!(work);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            match tokio::time::timeout(INTERRUPT_GRACE, &mut work).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) if e.is::<ExitError>() => Err(e),
                _ => Err(ExitError::interrupted().into()),
            }
        }
        result = &mut work => result,
    }
}

async fn run(cli: Cli, cancel: &CancellationToken) -> Result<()> {
    let kubeconfig = env::kubeconfig(cli.kubeconfig.as_deref());
    let format = cli.output;
    let label = OwnerLabel::default();

    // Local validation happens before connecting so bad input never costs a
    // cluster round trip.
    match cli.command {
        Commands::Completion(args) => {
            completion::handle(&args, &mut std::io::stdout());
            Ok(())
        }
        Commands::ListJobs(args) => {
            let store = KubeJobStore::connect(kubeconfig.as_deref()).await?;
            list::handle(&Scanner::new(store, label), &args, format, &mut std::io::stdout()).await
        }
        Commands::ShowJob(args) => {
            let store = KubeJobStore::connect(kubeconfig.as_deref()).await?;
            show::handle(&Scanner::new(store, label), &args, format, &mut std::io::stdout()).await
        }
        Commands::UploadLocal(args) => {
            let local = args.to_upload();
            local.validate()?;
            let store = KubeJobStore::connect(kubeconfig.as_deref()).await?;
            let uploader = Uploader::new(store, label, env::poll_config(args.job.timeout));
            upload::handle_local(&uploader, &local, cancel, format).await
        }
        Commands::UploadRemote(args) => {
            let request = args.to_request();
            request.validate()?;
            let store = KubeJobStore::connect(kubeconfig.as_deref()).await?;
            let uploader = Uploader::new(store, label, env::poll_config(args.job.timeout));
            upload::handle_remote(&uploader, &request, args.wait, cancel, format).await
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
