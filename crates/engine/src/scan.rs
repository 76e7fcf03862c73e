// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only listing of cdtool jobs.

use cdtool_adapters::{JobQuery, JobStore};
use cdtool_core::{JobView, OwnerLabel};

use crate::error::EngineError;

/// Lists jobs carrying the ownership label and projects them into views.
#[derive(Clone)]
pub struct Scanner<S> {
    store: S,
    label: OwnerLabel,
}

impl<S: JobStore> Scanner<S> {
    pub fn new(store: S, label: OwnerLabel) -> Self {
        Self { store, label }
    }

    /// Views of every owned job matching the filters, sorted by
    /// `(namespace, name)`.
    ///
    /// `namespace: None` scans all namespaces.
    pub async fn scan(
        &self,
        namespace: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<JobView>, EngineError> {
        let mut query = JobQuery::new(self.label.clone());
        if let Some(ns) = namespace {
            query = query.in_namespace(ns);
        }
        if let Some(n) = name {
            query = query.named(n);
        }
        let jobs = self.store.list(&query).await?;
        let mut views: Vec<JobView> = jobs.iter().map(JobView::of).collect();
        views.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
        tracing::debug!(count = views.len(), ?namespace, ?name, "scanned jobs");
        Ok(views)
    }

    /// Jobs across all namespaces. Succeeded jobs are dropped unless
    /// `include_succeeded` is set.
    pub async fn summary(&self, include_succeeded: bool) -> Result<Vec<JobView>, EngineError> {
        let mut views = self.scan(None, None).await?;
        if !include_succeeded {
            views.retain(|v| !v.succeeded);
        }
        Ok(views)
    }

    /// Jobs in one namespace, optionally narrowed to one name.
    pub async fn detail(
        &self,
        namespace: &str,
        name: Option<&str>,
    ) -> Result<Vec<JobView>, EngineError> {
        self.scan(Some(namespace), name).await
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
