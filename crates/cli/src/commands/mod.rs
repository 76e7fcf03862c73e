// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod completion;
pub mod list;
pub mod show;
pub mod upload;
