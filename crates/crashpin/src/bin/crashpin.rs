// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! `crashpin -u URL -f FILE [-f ...] [OPTIONS] PROGRAM [ARG ...]`

use std::process::ExitCode as ProcessExitCode;

use clap::Parser;
use tracing::{error, info};

use crashpin::{Cli, ExitCode, exit, logging};
use crashpin_arena::PinnedAllocator;

#[global_allocator]
static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();

fn main() -> ProcessExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return exit::parse_failure(&error).into();
        }
    };

    let config = match cli.into_configuration() {
        Ok(config) => config,
        Err(error) => {
            error!(error = %error, "Invalid options");
            return ExitCode::OptionsParse.into();
        }
    };

    info!(
        files = config.files().len(),
        url = config.url(),
        max_attempts = config.max_attempts(),
        "Initialized"
    );

    match crashpin::supervise(&config, &ALLOCATOR) {
        Ok(code) => exit::child_status(code),
        Err(error) => {
            error!(error = %error, "Fatal");
            error.exit_code().into()
        }
    }
}
