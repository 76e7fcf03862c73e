// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{DateTime, Utc};
use k8s_openapi::api::batch::v1::{Job, JobCondition, JobStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use crate::{build_job, JobName, JobRequest, OwnerLabel};

/// Build a labelled cdtool job with no status.
pub fn job(namespace: &str, name: &str, source: &str, tag: &str) -> Job {
    let request = JobRequest::new(source, tag).with_namespace(namespace);
    build_job(&JobName::from_string(name), &request, &OwnerLabel::default())
}

/// Status of a job still running, with `failed` failed pods so far.
pub fn running(failed: i32) -> JobStatus {
    JobStatus { failed: Some(failed), active: Some(1), ..Default::default() }
}

/// Status of a job that completed at `at`.
pub fn succeeded(failed: i32, at: DateTime<Utc>) -> JobStatus {
    JobStatus {
        failed: Some(failed),
        succeeded: Some(1),
        completion_time: Some(Time(at)),
        ..Default::default()
    }
}

/// Status of a job the cluster gave up on.
pub fn gave_up(failed: i32) -> JobStatus {
    JobStatus {
        failed: Some(failed),
        conditions: Some(vec![JobCondition {
            type_: "Failed".to_string(),
            status: "True".to_string(),
            reason: Some("BackoffLimitExceeded".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Attach a status to a job.
pub fn with_status(mut job: Job, status: JobStatus) -> Job {
    job.status = Some(status);
    job
}
