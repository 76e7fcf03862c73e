// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership label stamped on every job this tool creates.

use std::collections::BTreeMap;
use std::fmt;

/// Fixed key/value pair identifying jobs created by cdtool.
///
/// Passed explicitly to the job builder (which stamps it) and to the
/// registry scanner (which filters on it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerLabel {
    pub key: String,
    pub value: String,
}

impl OwnerLabel {
    pub const DEFAULT_KEY: &'static str = "app.kubernetes.io/name";
    pub const DEFAULT_VALUE: &'static str = "cdtool";

    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Label selector matching this label (`key=value`).
    pub fn selector(&self) -> String {
        format!("{}={}", self.key, self.value)
    }

    /// Single-entry label map for object metadata.
    pub fn to_labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(self.key.clone(), self.value.clone())])
    }

    /// Whether a label map carries this label.
    pub fn matches(&self, labels: Option<&BTreeMap<String, String>>) -> bool {
        labels.and_then(|l| l.get(&self.key)).is_some_and(|v| *v == self.value)
    }
}

impl Default for OwnerLabel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY, Self::DEFAULT_VALUE)
    }
}

impl fmt::Display for OwnerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
