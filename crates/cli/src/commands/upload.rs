// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cdtool upload-local` / `cdtool upload-remote` - submit conversion jobs

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use cdtool_adapters::JobStore;
use cdtool_core::{ImageConfig, JobRequest};
use cdtool_engine::{LocalUpload, UploadEvent, UploadReport, Uploader, WaitOutcome};

use crate::exit_error::{ExitError, FAILURE, TIMED_OUT};
use crate::output::{format_elapsed, upload_json, OutputFormat, ProgressPrinter};

/// Port the local file server listens on by default
pub const DEFAULT_LISTEN_PORT: u16 = 8899;

/// Settings shared by both upload commands.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct JobArgs {
    /// Namespace to create the job in [default: $CDTOOL_NAMESPACE or "default"]
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Image for the download stage [default: busybox:stable]
    #[arg(long)]
    pub download_image: Option<String>,

    /// Image for the build-and-push stage [default: ghcr.io/hujun-open/cdtool:latest]
    #[arg(long)]
    pub build_image: Option<String>,

    /// Stop waiting after this long (e.g. "90s", "10m", "1h30m")
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

impl JobArgs {
    pub fn namespace(&self) -> String {
        self.namespace.clone().unwrap_or_else(crate::env::namespace)
    }

    pub fn images(&self) -> ImageConfig {
        let defaults = crate::env::images();
        ImageConfig {
            download_image: self.download_image.clone().unwrap_or(defaults.download_image),
            build_image: self.build_image.clone().unwrap_or(defaults.build_image),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LocalArgs {
    /// Disk image file to serve
    pub file: PathBuf,

    /// Registry tag to push the container image to
    pub tag: String,

    /// Address to serve the file on; must be reachable from the cluster
    #[arg(long)]
    pub listen_addr: IpAddr,

    /// Port to serve the file on
    #[arg(long, default_value_t = DEFAULT_LISTEN_PORT)]
    pub listen_port: u16,

    #[command(flatten)]
    pub job: JobArgs,
}

impl LocalArgs {
    pub fn to_upload(&self) -> LocalUpload {
        LocalUpload {
            file: self.file.clone(),
            listen: SocketAddr::new(self.listen_addr, self.listen_port),
            tag: self.tag.clone(),
            namespace: self.job.namespace(),
            images: self.job.images(),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RemoteArgs {
    /// URL the cluster downloads the disk image from
    pub url: String,

    /// Registry tag to push the container image to
    pub tag: String,

    /// Wait for the job to finish
    #[arg(long)]
    pub wait: bool,

    #[command(flatten)]
    pub job: JobArgs,
}

impl RemoteArgs {
    pub fn to_request(&self) -> JobRequest {
        JobRequest::new(self.url.clone(), self.tag.clone())
            .with_namespace(self.job.namespace())
            .with_images(self.job.images())
    }
}

pub async fn handle_local<S: JobStore>(
    uploader: &Uploader<S>,
    upload: &LocalUpload,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> Result<()> {
    let mut printer = ProgressPrinter::new();
    let report = uploader
        .upload_local(upload, cancel, |e| on_event(&mut printer, format, &e))
        .await;
    finish(&mut printer, format, report?)
}

pub async fn handle_remote<S: JobStore>(
    uploader: &Uploader<S>,
    request: &JobRequest,
    wait: bool,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> Result<()> {
    let mut printer = ProgressPrinter::new();
    let report = uploader
        .upload_remote(request, wait, cancel, |e| on_event(&mut printer, format, &e))
        .await;
    finish(&mut printer, format, report?)
}

fn on_event(printer: &mut ProgressPrinter, format: OutputFormat, event: &UploadEvent) {
    if format == OutputFormat::Text {
        printer.print(event, &mut std::io::stdout());
    }
}

fn finish(printer: &mut ProgressPrinter, format: OutputFormat, report: UploadReport) -> Result<()> {
    match format {
        OutputFormat::Text => printer.finish(&mut std::io::stdout()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&upload_json(&report))?),
    }
    check_outcome(&report)
}

/// Map how the wait ended to the process exit status.
pub(crate) fn check_outcome(report: &UploadReport) -> Result<()> {
    let job = format!("{}/{}", report.submitted.namespace, report.submitted.name);
    match report.outcome {
        None | Some(WaitOutcome::Succeeded { .. }) => Ok(()),
        Some(WaitOutcome::Failed { elapsed, failed }) => Err(ExitError::new(
            FAILURE,
            format!("job {} failed after {} ({} failed pods)", job, format_elapsed(elapsed), failed),
        )
        .into()),
        Some(WaitOutcome::TimedOut { elapsed }) => Err(ExitError::new(
            TIMED_OUT,
            format!("timed out after {} waiting for job {}", format_elapsed(elapsed), job),
        )
        .into()),
        Some(WaitOutcome::Cancelled { .. }) => Err(ExitError::interrupted().into()),
    }
}

/// Parse a duration like "30s", "5m", "1h30m", or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let mut total_secs: u64 = 0;
    let mut current_num = String::new();

    for c in s.trim().chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
            continue;
        }
        let n: u64 = current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        current_num.clear();
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => anyhow::bail!("unknown duration unit '{}' in: {}", c, s),
        };
        total_secs = total_secs.saturating_add(n.saturating_mul(unit));
    }
    // Bare number → seconds
    if !current_num.is_empty() {
        let n: u64 = current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        total_secs = total_secs.saturating_add(n);
    }
    if total_secs == 0 {
        anyhow::bail!("duration must be > 0: {}", s);
    }
    Ok(Duration::from_secs(total_secs))
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
