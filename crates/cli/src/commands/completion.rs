// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cdtool completion` - shell completion scripts

use std::io::Write;

use clap::{Args, CommandFactory};
use clap_complete::Shell;

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CompletionArgs {
    /// Shell to generate the completion script for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn handle(args: &CompletionArgs, out: &mut dyn Write) {
    let mut cmd = crate::Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, bin, out);
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
