// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cdtool list-jobs` - jobs across all namespaces

use std::io::Write;

use anyhow::Result;
use clap::Args;

use cdtool_adapters::JobStore;
use cdtool_core::JobView;
use cdtool_engine::Scanner;

use crate::output::{handle_list, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Include jobs that already succeeded
    #[arg(long)]
    pub all: bool,
}

pub async fn handle<S: JobStore>(
    scanner: &Scanner<S>,
    args: &ListArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let jobs = scanner.summary(args.all).await?;
    let empty = if args.all {
        "No jobs found"
    } else {
        "No unfinished jobs found (use --all to include succeeded)"
    };
    handle_list(format, &jobs, empty, out, |items, out| render(items, out))
}

pub(crate) fn render(jobs: &[JobView], out: &mut (impl Write + ?Sized)) {
    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::right("FAILED"),
        Column::left("SUCCESS"),
        Column::muted("COMPLETION TIME"),
    ]);
    for job in jobs {
        table.row(vec![
            job.qualified_name(),
            job.failed.to_string(),
            job.succeeded.to_string(),
            job.completion_time.clone(),
        ]);
    }
    table.render(out);
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
