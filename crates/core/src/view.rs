// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side projections of cdtool jobs.
//!
//! The cluster owns job status; these types only read it. [`JobView`] also
//! reads the source and tag back out of the job spec by position: the first
//! init-container env entry is the source URL, the first main-container env
//! entry is the destination tag (see [`crate::job::build_job`]).

use chrono::{DateTime, Utc};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Container;
use serde::Serialize;

/// Placeholder for values a job does not (yet) have.
pub const NOT_AVAILABLE: &str = "n/a";

/// Live counters of a job, as last observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobProgress {
    pub failed: i32,
    pub succeeded: i32,
    pub completion_time: Option<DateTime<Utc>>,
    /// The cluster has marked the job `Failed` and will not start more pods
    pub gave_up: bool,
}

impl JobProgress {
    pub fn of(job: &Job) -> Self {
        let Some(status) = job.status.as_ref() else {
            return Self::default();
        };
        let gave_up = status
            .conditions
            .as_ref()
            .is_some_and(|c| c.iter().any(|c| c.type_ == "Failed" && c.status == "True"));
        Self {
            failed: status.failed.unwrap_or(0),
            succeeded: status.succeeded.unwrap_or(0),
            completion_time: status.completion_time.as_ref().map(|t| t.0),
            gave_up,
        }
    }

    /// Jobs are single-completion: one success means done.
    pub fn is_succeeded(&self) -> bool {
        self.succeeded >= 1
    }
}

/// Display fields of one cdtool job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobView {
    pub namespace: String,
    pub name: String,
    pub source: String,
    pub tag: String,
    pub failed: i32,
    pub succeeded: bool,
    pub completion_time: String,
}

impl JobView {
    pub fn of(job: &Job) -> Self {
        let progress = JobProgress::of(job);
        let pod = job.spec.as_ref().and_then(|s| s.template.spec.as_ref());
        let source = pod
            .and_then(|p| p.init_containers.as_ref())
            .and_then(|c| c.first())
            .and_then(first_env_value);
        let tag = pod.and_then(|p| p.containers.first()).and_then(first_env_value);

        Self {
            namespace: job.metadata.namespace.clone().unwrap_or_default(),
            name: job.metadata.name.clone().unwrap_or_default(),
            source: source.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            tag: tag.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            failed: progress.failed,
            succeeded: progress.is_succeeded(),
            completion_time: format_completion_time(progress.completion_time),
        }
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Format a completion time as `YYYY-MM-DD HH:MM:SS` (UTC), or `n/a`.
pub fn format_completion_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn first_env_value(container: &Container) -> Option<String> {
    container.env.as_ref()?.first()?.value.clone()
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
