// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job name generation.
//!
//! Names have the form `cdtool-<yymmdd>-<hhmmss>-<suffix>`: the UTC
//! timestamp keeps them human-sortable, the random suffix keeps two names
//! minted within the same second apart without any coordination.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Characters used for the random suffix.
///
/// Lowercase consonants and digits only, so every name is a valid DNS-1123
/// label and never spells a word by accident.
pub const SUFFIX_ALPHABET: [char; 27] = [
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w',
    'x', 'z', '2', '4', '5', '6', '7', '8', '9',
];

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 4;

/// Prefix shared by all generated job names.
pub const NAME_PREFIX: &str = "cdtool";

/// Name of a cdtool job, unique within its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Mint a fresh name stamped with the current UTC time.
    pub fn generate() -> Self {
        Self::at(Utc::now())
    }

    /// Mint a fresh name stamped with `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        let suffix = nanoid::nanoid!(SUFFIX_LEN, &SUFFIX_ALPHABET);
        Self(format!("{}-{}-{}", NAME_PREFIX, now.format("%y%m%d-%H%M%S"), suffix))
    }

    pub fn from_string(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<JobName> for String {
    fn from(name: JobName) -> Self {
        name.0
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
