// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cdtool show-job` - source and tag of jobs in one namespace

use std::io::Write;

use anyhow::Result;
use clap::Args;

use cdtool_adapters::JobStore;
use cdtool_core::JobView;
use cdtool_engine::Scanner;

use crate::exit_error::{ExitError, FAILURE};
use crate::output::{handle_list, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ShowArgs {
    /// Job name (all cdtool jobs in the namespace when omitted)
    pub name: Option<String>,

    /// Namespace to look in [default: $CDTOOL_NAMESPACE or "default"]
    #[arg(short, long)]
    pub namespace: Option<String>,
}

pub async fn handle<S: JobStore>(
    scanner: &Scanner<S>,
    args: &ShowArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = args.namespace.clone().unwrap_or_else(crate::env::namespace);
    let jobs = scanner.detail(&namespace, args.name.as_deref()).await?;
    if let (Some(name), true) = (&args.name, jobs.is_empty()) {
        return Err(ExitError::new(
            FAILURE,
            format!("job {} not found in namespace {}", name, namespace),
        )
        .into());
    }
    let empty = format!("No jobs found in namespace {}", namespace);
    handle_list(format, &jobs, &empty, out, |items, out| render(items, out))
}

pub(crate) fn render(jobs: &[JobView], out: &mut (impl Write + ?Sized)) {
    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::left("SRC"),
        Column::left("TAG"),
        Column::left("SUCCEED"),
        Column::muted("FINISH TIME"),
    ]);
    for job in jobs {
        table.row(vec![
            job.name.clone(),
            job.source.clone(),
            job.tag.clone(),
            job.succeeded.to_string(),
            job.completion_time.clone(),
        ]);
    }
    table.render(out);
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
