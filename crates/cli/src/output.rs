// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::time::Duration;

use cdtool_engine::{PollEvent, UploadEvent, UploadReport, WaitOutcome};
use clap::ValueEnum;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a list as text table or JSON. Handles empty check + format branch.
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    out: &mut dyn Write,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        }
        OutputFormat::Text => {
            if items.is_empty() {
                writeln!(out, "{}", empty_msg)?;
            } else {
                render_text(items, out);
            }
        }
    }
    Ok(())
}

/// Format elapsed time as `42s`, `3m07s`, or `1h02m03s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m{:02}s", secs / 60, secs % 60),
        _ => format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60),
    }
}

/// Prints upload progress in text mode.
///
/// Poll progress rewrites a single line with `\r`; any other message first
/// ends that line.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    line_open: bool,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, event: &UploadEvent, out: &mut (impl Write + ?Sized)) {
        let _ = self.write(event, out);
    }

    fn write(&mut self, event: &UploadEvent, out: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        match event {
            UploadEvent::Serving { url } => {
                self.close_line(out)?;
                writeln!(out, "Serving disk image at {}", url)?;
            }
            UploadEvent::Submitted(s) => {
                self.close_line(out)?;
                writeln!(out, "Job {} created in namespace {}", s.name, s.namespace)?;
            }
            UploadEvent::Poll(PollEvent::Progress { elapsed, failed }) => {
                write!(
                    out,
                    "\r{}",
                    crate::color::context(&format!(
                        "failed {} times, time elapsed {}...",
                        failed,
                        format_elapsed(*elapsed)
                    ))
                )?;
                out.flush()?;
                self.line_open = true;
            }
            // logged as a warning by the poller
            UploadEvent::Poll(PollEvent::Retrying { .. }) => {}
            UploadEvent::Poll(PollEvent::Succeeded { elapsed, .. }) => {
                self.close_line(out)?;
                writeln!(out, "done in {}", format_elapsed(*elapsed))?;
            }
            UploadEvent::Poll(PollEvent::Failed { .. }) => {
                self.close_line(out)?;
            }
        }
        Ok(())
    }

    /// End an open progress line, if any.
    pub fn finish(&mut self, out: &mut (impl Write + ?Sized)) {
        let _ = self.close_line(out);
    }

    fn close_line(&mut self, out: &mut (impl Write + ?Sized)) -> std::io::Result<()> {
        if std::mem::take(&mut self.line_open) {
            writeln!(out)?;
        }
        Ok(())
    }
}

/// JSON summary of an upload.
pub fn upload_json(report: &UploadReport) -> serde_json::Value {
    let (outcome, elapsed, failed) = match report.outcome {
        None => ("submitted", None, None),
        Some(WaitOutcome::Succeeded { elapsed, failed }) => ("succeeded", Some(elapsed), Some(failed)),
        Some(WaitOutcome::Failed { elapsed, failed }) => ("failed", Some(elapsed), Some(failed)),
        Some(WaitOutcome::TimedOut { elapsed }) => ("timed_out", Some(elapsed), None),
        Some(WaitOutcome::Cancelled { elapsed }) => ("cancelled", Some(elapsed), None),
    };
    serde_json::json!({
        "name": report.submitted.name,
        "namespace": report.submitted.namespace,
        "source_url": report.submitted.source_url,
        "tag": report.submitted.tag,
        "outcome": outcome,
        "elapsed_secs": elapsed.map(|e| e.as_secs_f64()),
        "failed": failed,
    })
}
