// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cdtool_core::{ImageConfig, JobRequest};
use cdtool_engine::PollConfig;

/// Version string shown by `--version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Resolve the kubeconfig file: `--kubeconfig` > `KUBECONFIG` > `~/.kube/config`.
///
/// `None` lets the client infer its config: `KUBECONFIG` (which may list
/// several files) is handled there, and so is in-cluster service account auth.
pub fn kubeconfig(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if std::env::var_os("KUBECONFIG").is_some_and(|v| !v.is_empty()) {
        return None;
    }
    dirs::home_dir().map(|home| home.join(".kube").join("config")).filter(|p| p.is_file())
}

/// Delay between job status checks (`CDTOOL_POLL_INTERVAL_MS`, default 1s)
pub fn poll_interval() -> Duration {
    std::env::var("CDTOOL_POLL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1))
}

/// Consecutive transient fetch failures tolerated (`CDTOOL_FETCH_RETRIES`, default 5)
pub fn fetch_retries() -> u32 {
    std::env::var("CDTOOL_FETCH_RETRIES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(PollConfig::default().max_fetch_retries)
}

/// Namespace used when `--namespace` is not given (`CDTOOL_NAMESPACE`)
pub fn namespace() -> String {
    non_empty("CDTOOL_NAMESPACE").unwrap_or_else(|| JobRequest::DEFAULT_NAMESPACE.to_string())
}

/// Images used when not given on the command line
/// (`CDTOOL_DOWNLOAD_IMAGE`, `CDTOOL_BUILD_IMAGE`)
pub fn images() -> ImageConfig {
    let defaults = ImageConfig::default();
    ImageConfig {
        download_image: non_empty("CDTOOL_DOWNLOAD_IMAGE").unwrap_or(defaults.download_image),
        build_image: non_empty("CDTOOL_BUILD_IMAGE").unwrap_or(defaults.build_image),
    }
}

/// Poller settings from the environment plus an optional `--timeout`.
pub fn poll_config(timeout: Option<Duration>) -> PollConfig {
    PollConfig {
        interval: poll_interval(),
        timeout,
        max_fetch_retries: fetch_retries(),
        ..PollConfig::default()
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
