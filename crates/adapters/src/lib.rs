// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cdtool-adapters: cluster store and local file serving

pub mod source;
pub mod store;

pub use source::{SourceError, SourceServer};
pub use store::{JobQuery, JobStore, KubeJobStore, StoreError};

#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeJobStore, StoreCall};
