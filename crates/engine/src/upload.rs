// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upload flows: submit a conversion job for a remote URL or a local file.
//!
//! A local upload serves the file from this process, so the server has to
//! outlive the job's download stage. It is kept up until the wait ends
//! (success, failure, timeout, or cancellation) and torn down afterwards.

use cdtool_adapters::{JobStore, SourceServer};
use cdtool_core::{ImageConfig, JobName, JobRequest, OwnerLabel};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::poll::{wait_for_completion, PollConfig, PollEvent, WaitOutcome};
use crate::submit::{submit, Submitted};

/// Progress of an upload, reported as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Local file is being served at `url`
    Serving { url: String },
    /// Job accepted by the cluster
    Submitted(Submitted),
    Poll(PollEvent),
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub submitted: Submitted,
    /// How the wait ended; `None` when the caller did not wait
    pub outcome: Option<WaitOutcome>,
}

/// A local disk image to serve and convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUpload {
    pub file: PathBuf,
    pub listen: SocketAddr,
    pub tag: String,
    pub namespace: String,
    pub images: ImageConfig,
}

impl LocalUpload {
    /// The job request once the file is served at `source_url`.
    pub fn request(&self, source_url: impl Into<String>) -> JobRequest {
        JobRequest::new(source_url, self.tag.clone())
            .with_namespace(self.namespace.clone())
            .with_images(self.images.clone())
    }

    /// Check everything that can be checked before the server starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.request(self.file.to_string_lossy()).validate()?;
        Ok(())
    }
}

/// Runs upload flows against a job store.
#[derive(Clone)]
pub struct Uploader<S> {
    store: S,
    label: OwnerLabel,
    poll: PollConfig,
}

impl<S: JobStore> Uploader<S> {
    pub fn new(store: S, label: OwnerLabel, poll: PollConfig) -> Self {
        Self { store, label, poll }
    }

    /// Submit a job for an image the cluster can download itself, optionally
    /// waiting for it to finish.
    pub async fn upload_remote(
        &self,
        request: &JobRequest,
        wait: bool,
        cancel: &CancellationToken,
        mut on_event: impl FnMut(UploadEvent),
    ) -> Result<UploadReport, EngineError> {
        let name = JobName::generate();
        let submitted = submit(&self.store, &name, request, &self.label).await?;
        on_event(UploadEvent::Submitted(submitted.clone()));
        if !wait {
            return Ok(UploadReport { submitted, outcome: None });
        }
        let outcome = self.wait(&submitted, cancel, &mut on_event).await?;
        Ok(UploadReport { submitted, outcome: Some(outcome) })
    }

    /// Serve a local file, submit a job that downloads it, and wait for the
    /// job to finish before stopping the server.
    ///
    /// Nothing is submitted if the file cannot be copied or the address
    /// cannot be bound.
    pub async fn upload_local(
        &self,
        upload: &LocalUpload,
        cancel: &CancellationToken,
        mut on_event: impl FnMut(UploadEvent),
    ) -> Result<UploadReport, EngineError> {
        upload.validate()?;
        let name = JobName::generate();
        let server = SourceServer::start(&upload.file, upload.listen, name.as_str(), cancel).await?;
        on_event(UploadEvent::Serving { url: server.url().to_string() });

        let request = upload.request(server.url());
        let submitted = match submit(&self.store, &name, &request, &self.label).await {
            Ok(submitted) => submitted,
            Err(e) => {
                stop_server(server).await;
                return Err(e);
            }
        };
        on_event(UploadEvent::Submitted(submitted.clone()));

        let waited = self.wait(&submitted, cancel, &mut on_event).await;
        stop_server(server).await;
        Ok(UploadReport { submitted, outcome: Some(waited?) })
    }

    async fn wait(
        &self,
        submitted: &Submitted,
        cancel: &CancellationToken,
        on_event: &mut impl FnMut(UploadEvent),
    ) -> Result<WaitOutcome, EngineError> {
        let outcome = wait_for_completion(
            &self.store,
            &submitted.namespace,
            submitted.name.as_str(),
            &self.poll,
            cancel,
            |e| on_event(UploadEvent::Poll(e)),
        )
        .await?;
        Ok(outcome)
    }
}

async fn stop_server(server: SourceServer) {
    if let Err(e) = server.stop().await {
        tracing::warn!(error = %e, "failed to stop disk image server cleanly");
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
