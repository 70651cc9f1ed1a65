// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process exit codes.
//!
//! The tool's own failures use the codes below. After a supervised run the
//! process exits with the child's status instead, so a child exiting with,
//! say, 4 is indistinguishable from a transport init failure.

/// Exit codes for crashpin's own outcomes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum ExitCode {
    /// Clean shutdown.
    Normal = 0,
    /// Invalid options.
    OptionsParse = 1,
    /// The pinned arena could not be mapped or locked.
    ArenaInit = 2,
    /// The arena could not be installed behind the allocator.
    AllocatorInstall = 3,
    /// The HTTP transport could not be created.
    TransportInit = 4,
    /// Signal handlers could not be registered.
    SignalInit = 5,
    /// Waiting for a signal failed.
    SignalWait = 6,
    /// The target program could not be executed.
    ExecFailure = 7,
    /// A state that should be impossible was reached.
    Unreachable = 8,
}

impl ExitCode {
    /// Numeric value.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}

/// Converts a child-derived status (0..=255 on Unix) into a process exit code.
///
/// Out-of-range values collapse to 1.
pub fn child_status(code: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Exit code for a failed command-line parse: help and version requests are
/// successful exits.
pub fn parse_failure(error: &clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Normal,
        _ => ExitCode::OptionsParse,
    }
}
