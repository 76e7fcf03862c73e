// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cdtool_adapters::{SourceError, StoreError};
use cdtool_core::RequestError;
use thiserror::Error;

use crate::poll::PollError;

/// Errors that end an orchestration command.
///
/// Every variant is terminal for the current invocation; nothing here is
/// retried beyond what the poller already absorbed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Poll(#[from] PollError),
}
