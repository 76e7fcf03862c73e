// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job requests: what the operator asked to convert, and where to push it.

use thiserror::Error;

/// Errors from validating a [`JobRequest`] before any cluster call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("image source is not specified")]
    MissingSource,

    #[error("tag is not specified")]
    MissingTag,

    #[error("namespace is not specified")]
    MissingNamespace,

    #[error("{0} image is not specified")]
    MissingImage(&'static str),
}

/// Container images used by the two job stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    /// Image for the init stage that fetches the disk image
    pub download_image: String,
    /// Image carrying the build-and-push entrypoint
    pub build_image: String,
}

impl ImageConfig {
    pub const DEFAULT_DOWNLOAD_IMAGE: &'static str = "busybox:stable";
    pub const DEFAULT_BUILD_IMAGE: &'static str = "ghcr.io/hujun-open/cdtool:latest";
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            download_image: Self::DEFAULT_DOWNLOAD_IMAGE.to_string(),
            build_image: Self::DEFAULT_BUILD_IMAGE.to_string(),
        }
    }
}

/// A request to convert one disk image into a container image.
///
/// Transient: lives for the duration of a single upload command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// URL the init stage downloads from
    pub source_url: String,
    /// Registry tag the build stage pushes to
    pub destination_tag: String,
    pub namespace: String,
    pub images: ImageConfig,
}

impl JobRequest {
    pub const DEFAULT_NAMESPACE: &'static str = "default";

    pub fn new(source_url: impl Into<String>, destination_tag: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_tag: destination_tag.into(),
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            images: ImageConfig::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_images(mut self, images: ImageConfig) -> Self {
        self.images = images;
        self
    }

    /// Check that every field the job depends on is present.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.source_url.trim().is_empty() {
            return Err(RequestError::MissingSource);
        }
        if self.destination_tag.trim().is_empty() {
            return Err(RequestError::MissingTag);
        }
        if self.namespace.trim().is_empty() {
            return Err(RequestError::MissingNamespace);
        }
        if self.images.download_image.trim().is_empty() {
            return Err(RequestError::MissingImage("download"));
        }
        if self.images.build_image.trim().is_empty() {
            return Err(RequestError::MissingImage("build"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
