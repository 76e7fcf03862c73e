// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cdtool-engine: job lifecycle orchestration
//!
//! Submits conversion jobs, watches them to completion, and scans the
//! cluster for jobs cdtool created.

mod error;
pub mod poll;
pub mod scan;
pub mod submit;
pub mod upload;

pub use error::EngineError;
pub use poll::{wait_for_completion, PollConfig, PollError, PollEvent, WaitOutcome};
pub use scan::Scanner;
pub use submit::{submit, Submitted};
pub use upload::{LocalUpload, UploadEvent, UploadReport, Uploader};
