// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster store for batch Jobs.
//!
//! The cluster is the system of record for jobs and their status. cdtool only
//! ever creates, reads, and lists them; it never updates or deletes.

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use kube::api::{Api, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use thiserror::Error;

use cdtool_core::OwnerLabel;

/// Errors from cluster store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("failed to build cluster client: {0}")]
    Client(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("cluster rejected request: {0}")]
    Rejected(String),

    #[error("cluster unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    /// Server messages are kept as-is; only the kind is inferred.
    fn from_kube(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => match resp.code {
                404 => StoreError::NotFound(resp.message),
                409 => StoreError::Conflict(resp.message),
                429 | 500..=599 => StoreError::Unavailable(resp.message),
                _ => StoreError::Rejected(resp.message),
            },
            kube::Error::HyperError(_) | kube::Error::Service(_) | kube::Error::ReadEvents(_) => {
                StoreError::Unavailable(err.to_string())
            }
            kube::Error::Auth(_)
            | kube::Error::InferConfig(_)
            | kube::Error::BuildRequest(_)
            | kube::Error::HttpError(_)
            | kube::Error::TlsRequired => StoreError::Client(err.to_string()),
            other => StoreError::Rejected(other.to_string()),
        }
    }
}

/// Which jobs a list call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    /// Ownership label every returned job must carry
    pub label: OwnerLabel,
    /// Restrict to one namespace (`None` = all namespaces)
    pub namespace: Option<String>,
    /// Restrict to one exact job name
    pub name: Option<String>,
}

impl JobQuery {
    pub fn new(label: OwnerLabel) -> Self {
        Self { label, namespace: None, name: None }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn list_params(&self) -> ListParams {
        let lp = ListParams::default().labels(&self.label.selector());
        match &self.name {
            Some(name) => lp.fields(&format!("metadata.name={}", name)),
            None => lp,
        }
    }
}

/// CRUD subset of the cluster API used by cdtool.
#[async_trait]
pub trait JobStore: Clone + Send + Sync + 'static {
    /// Create a job. Atomic: either the whole object is stored or nothing is.
    async fn create(&self, job: &Job) -> Result<Job, StoreError>;

    /// Fetch one job by namespaced name.
    async fn get(&self, namespace: &str, name: &str) -> Result<Job, StoreError>;

    /// List jobs matching a query.
    async fn list(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError>;
}

/// Job store backed by a Kubernetes API server via `kube-rs`.
#[derive(Clone)]
pub struct KubeJobStore {
    client: Client,
}

impl KubeJobStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using an explicit kubeconfig file, or the inferred config
    /// (`KUBECONFIG`, `~/.kube/config`, in-cluster) when none is given.
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, StoreError> {
        let config = match kubeconfig {
            Some(path) => {
                let kc = Kubeconfig::read_from(path).map_err(|e| {
                    StoreError::Client(format!("error reading kubeconfig {}: {}", path.display(), e))
                })?;
                Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| {
                        StoreError::Client(format!(
                            "error building config from {}: {}",
                            path.display(),
                            e
                        ))
                    })?
            }
            None => Config::infer().await.map_err(|e| StoreError::Client(e.to_string()))?,
        };
        tracing::debug!(cluster_url = %config.cluster_url, "connecting to cluster");
        let client = Client::try_from(config).map_err(|e| StoreError::Client(e.to_string()))?;
        Ok(Self::new(client))
    }

    fn namespaced(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl JobStore for KubeJobStore {
    async fn create(&self, job: &Job) -> Result<Job, StoreError> {
        let namespace = job.metadata.namespace.as_deref().unwrap_or("default");
        self.namespaced(namespace)
            .create(&PostParams::default(), job)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Job, StoreError> {
        self.namespaced(namespace)
            .get(name)
            .await
            .map_err(StoreError::from_kube)
    }

    async fn list(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError> {
        let api: Api<Job> = match &query.namespace {
            Some(ns) => self.namespaced(ns),
            None => Api::all(self.client.clone()),
        };
        let list = api
            .list(&query.list_params())
            .await
            .map_err(StoreError::from_kube)?;
        Ok(list.items)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{JobQuery, JobStore, StoreError};
    use async_trait::async_trait;
    use k8s_openapi::api::batch::v1::{Job, JobStatus};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    /// Recorded store call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoreCall {
        Create { namespace: String, name: String },
        Get { namespace: String, name: String },
        List(JobQuery),
    }

    #[derive(Default)]
    struct FakeStoreState {
        jobs: Vec<Job>,
        calls: Vec<StoreCall>,
        /// Status each subsequent `get` applies, per `namespace/name`
        scripted: HashMap<String, VecDeque<JobStatus>>,
        /// Statuses for jobs without their own script
        scripted_any: VecDeque<JobStatus>,
        /// Errors returned by the next `get` calls, in order
        get_errors: VecDeque<StoreError>,
        create_error: Option<StoreError>,
    }

    /// In-memory job store for testing.
    ///
    /// `get` advances a scripted status sequence so tests can replay a job's
    /// lifecycle one poll at a time.
    #[derive(Clone, Default)]
    pub struct FakeJobStore {
        inner: Arc<Mutex<FakeStoreState>>,
    }

    fn key(namespace: &str, name: &str) -> String {
        format!("{}/{}", namespace, name)
    }

    fn job_key(job: &Job) -> String {
        key(
            job.metadata.namespace.as_deref().unwrap_or_default(),
            job.metadata.name.as_deref().unwrap_or_default(),
        )
    }

    impl FakeJobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store a job directly, bypassing `create`.
        pub fn insert(&self, job: Job) {
            self.inner.lock().jobs.push(job);
        }

        /// Queue statuses applied by successive `get` calls on a job.
        /// Once the queue drains the last applied status sticks.
        pub fn script_status(
            &self,
            namespace: &str,
            name: &str,
            statuses: impl IntoIterator<Item = JobStatus>,
        ) {
            self.inner
                .lock()
                .scripted
                .entry(key(namespace, name))
                .or_default()
                .extend(statuses);
        }

        /// Like [`Self::script_status`], for any job without its own script.
        /// Useful when the job name is generated by the code under test.
        pub fn script_any_status(&self, statuses: impl IntoIterator<Item = JobStatus>) {
            self.inner.lock().scripted_any.extend(statuses);
        }

        /// Make the next `get` calls fail with these errors, in order.
        pub fn fail_gets(&self, errors: impl IntoIterator<Item = StoreError>) {
            self.inner.lock().get_errors.extend(errors);
        }

        /// Make the next `create` call fail.
        pub fn fail_create(&self, error: StoreError) {
            self.inner.lock().create_error = Some(error);
        }

        pub fn jobs(&self) -> Vec<Job> {
            self.inner.lock().jobs.clone()
        }

        pub fn calls(&self) -> Vec<StoreCall> {
            self.inner.lock().calls.clone()
        }

        /// Number of `get` calls made so far.
        pub fn get_count(&self) -> usize {
            self.inner.lock().calls.iter().filter(|c| matches!(c, StoreCall::Get { .. })).count()
        }
    }

    #[async_trait]
    impl JobStore for FakeJobStore {
        async fn create(&self, job: &Job) -> Result<Job, StoreError> {
            let mut state = self.inner.lock();
            let namespace = job.metadata.namespace.clone().unwrap_or_default();
            let name = job.metadata.name.clone().unwrap_or_default();
            state.calls.push(StoreCall::Create { namespace, name: name.clone() });
            if let Some(err) = state.create_error.take() {
                return Err(err);
            }
            let k = job_key(job);
            if state.jobs.iter().any(|j| job_key(j) == k) {
                return Err(StoreError::Conflict(format!("jobs.batch \"{}\" already exists", name)));
            }
            state.jobs.push(job.clone());
            Ok(job.clone())
        }

        async fn get(&self, namespace: &str, name: &str) -> Result<Job, StoreError> {
            let mut state = self.inner.lock();
            state
                .calls
                .push(StoreCall::Get { namespace: namespace.to_string(), name: name.to_string() });
            if let Some(err) = state.get_errors.pop_front() {
                return Err(err);
            }
            let k = key(namespace, name);
            let next = match state.scripted.get_mut(&k) {
                Some(queue) => queue.pop_front(),
                None => state.scripted_any.pop_front(),
            };
            let job = state
                .jobs
                .iter_mut()
                .find(|j| job_key(j) == k)
                .ok_or_else(|| StoreError::NotFound(format!("jobs.batch \"{}\" not found", name)))?;
            if let Some(status) = next {
                job.status = Some(status);
            }
            Ok(job.clone())
        }

        async fn list(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError> {
            let mut state = self.inner.lock();
            state.calls.push(StoreCall::List(query.clone()));
            Ok(state
                .jobs
                .iter()
                .filter(|j| query.label.matches(j.metadata.labels.as_ref()))
                .filter(|j| match query.namespace.as_deref() {
                    Some(ns) => j.metadata.namespace.as_deref() == Some(ns),
                    None => true,
                })
                .filter(|j| match query.name.as_deref() {
                    Some(n) => j.metadata.name.as_deref() == Some(n),
                    None => true,
                })
                .cloned()
                .collect())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeJobStore, StoreCall};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
