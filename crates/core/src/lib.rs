// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cdtool-core: job descriptors for converting disk images into container images

pub mod job;
pub mod label;
pub mod name;
pub mod request;
pub mod view;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use job::build_job;
pub use label::OwnerLabel;
pub use name::JobName;
pub use request::{ImageConfig, JobRequest, RequestError};
pub use view::{format_completion_time, JobProgress, JobView};
