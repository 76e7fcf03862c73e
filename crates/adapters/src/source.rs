// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ephemeral HTTP server for local disk images.
//!
//! When the disk image lives on the operator's machine, the job's init
//! container cannot reach it directly. [`SourceServer`] copies the file into a
//! fresh temporary directory and serves that directory (and nothing else) over
//! plain HTTP until stopped.
//!
//! The listener is bound before [`SourceServer::start`] returns, so a port
//! conflict surfaces before any job is submitted.

use axum::Router;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Errors from preparing or running the source server
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] io::Error),

    #[error("failed to copy {path} to {dest}: {source}")]
    Copy {
        path: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("file server failed: {0}")]
    Serve(#[source] io::Error),

    #[error("file server task aborted: {0}")]
    Task(String),

    #[error("failed to remove temporary directory: {0}")]
    Cleanup(#[source] io::Error),
}

/// A running file server for one disk image.
///
/// Dropping the handle signals shutdown and removes the temporary directory;
/// [`SourceServer::stop`] does the same but waits for the server task and
/// reports its errors.
pub struct SourceServer {
    url: String,
    addr: SocketAddr,
    root: Option<TempDir>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<io::Result<()>>>,
}

impl SourceServer {
    /// Copy `file` into a temporary directory named `<dir_prefix>-*` and
    /// serve it on `listen`.
    ///
    /// The server also stops when `cancel` is cancelled.
    pub async fn start(
        file: &Path,
        listen: SocketAddr,
        dir_prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<Self, SourceError> {
        let metadata = tokio::fs::metadata(file)
            .await
            .map_err(|e| SourceError::Read { path: file.to_path_buf(), source: e })?;
        if !metadata.is_file() {
            return Err(SourceError::NotAFile(file.to_path_buf()));
        }
        let file_name = served_name(file).ok_or_else(|| SourceError::NotAFile(file.to_path_buf()))?;

        let root = tempfile::Builder::new()
            .prefix(&format!("{}-", dir_prefix))
            .tempdir()
            .map_err(SourceError::TempDir)?;
        let dest = root.path().join(&file_name);
        tokio::fs::copy(file, &dest).await.map_err(|e| SourceError::Copy {
            path: file.to_path_buf(),
            dest: dest.clone(),
            source: e,
        })?;

        let listener = TcpListener::bind(listen)
            .await
            .map_err(|e| SourceError::Bind { addr: listen, source: e })?;
        let addr =
            listener.local_addr().map_err(|e| SourceError::Bind { addr: listen, source: e })?;
        let url = format!("http://{}/{}", addr, file_name);

        let app = Router::new()
            .fallback_service(ServeDir::new(root.path()))
            .layer(TraceLayer::new_for_http());
        let shutdown = cancel.child_token();
        let token = shutdown.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
        });

        tracing::info!(%addr, %url, root = %root.path().display(), "serving disk image");
        Ok(Self { url, addr, root: Some(root), shutdown, task: Some(task) })
    }

    /// URL the init container should download from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Temporary directory being served.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_ref().map(TempDir::path)
    }

    /// Shut the server down, wait for it, and remove the temporary directory.
    pub async fn stop(mut self) -> Result<(), SourceError> {
        self.shutdown.cancel();
        let served = match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result.map_err(SourceError::Serve),
                Err(e) => Err(SourceError::Task(e.to_string())),
            },
            None => Ok(()),
        };
        let cleaned = match self.root.take() {
            Some(root) => root.close().map_err(SourceError::Cleanup),
            None => Ok(()),
        };
        tracing::info!(addr = %self.addr, "disk image server stopped");
        served.and(cleaned)
    }
}

impl Drop for SourceServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Name the copied file is served under: the basename, with anything outside
/// `[A-Za-z0-9._-]` replaced so it can go into a URL verbatim.
pub(crate) fn served_name(file: &Path) -> Option<String> {
    let name = file.file_name()?.to_string_lossy();
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    Some(cleaned)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
