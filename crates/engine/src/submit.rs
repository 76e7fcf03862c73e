// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission.

use cdtool_adapters::JobStore;
use cdtool_core::{build_job, JobName, JobRequest, OwnerLabel};
use serde::Serialize;

use crate::error::EngineError;

/// A job the cluster accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submitted {
    pub name: JobName,
    pub namespace: String,
    pub source_url: String,
    pub tag: String,
}

/// Validate the request, build its job, and create it exactly once.
///
/// Store errors are returned as-is; the cluster's own conflict and
/// validation answers are authoritative, so nothing is retried here.
pub async fn submit<S: JobStore>(
    store: &S,
    name: &JobName,
    request: &JobRequest,
    label: &OwnerLabel,
) -> Result<Submitted, EngineError> {
    request.validate()?;
    let job = build_job(name, request, label);
    store.create(&job).await?;
    tracing::info!(job = %name, namespace = %request.namespace, tag = %request.destination_tag, "job created");
    Ok(Submitted {
        name: name.clone(),
        namespace: request.namespace.clone(),
        source_url: request.source_url.clone(),
        tag: request.destination_tag.clone(),
    })
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
