// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! How the child ended and what the supervisor concludes from it.

use std::process::ExitStatus;

/// Classified child termination.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChildOutcome {
    /// Normal exit with this status code.
    Exited(i32),
    /// Killed by this signal.
    Signaled(i32),
    /// The status could not be collected or decoded.
    Unknown,
}

impl ChildOutcome {
    /// Decodes a raw wait status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;

            if let Some(signum) = status.signal() {
                return Self::Signaled(signum);
            }
        }

        Self::Unknown
    }

    /// Anything but a zero exit status.
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Exited(0))
    }

    /// Shell-style process exit code: the status itself, `128 + signal` for
    /// signal deaths, 1 when unknown.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Self::Exited(code) => code,
            Self::Signaled(signum) => 128 + signum,
            Self::Unknown => 1,
        }
    }
}

/// Supervisor conclusion.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Verdict {
    /// The child exited with status 0.
    Normal,
    /// Upload the artifacts.
    Abnormal,
}

/// Result of one supervised run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Termination {
    /// What to do next.
    pub verdict: Verdict,
    /// What the child did.
    pub outcome: ChildOutcome,
    /// Signal forwarded to the child, if any.
    pub forwarded: Option<i32>,
}

impl Termination {
    pub(crate) fn new(outcome: ChildOutcome, forwarded: Option<i32>) -> Self {
        let verdict = if outcome.is_abnormal() {
            Verdict::Abnormal
        } else {
            Verdict::Normal
        };

        Self {
            verdict,
            outcome,
            forwarded,
        }
    }

    /// Shorthand for `verdict == Verdict::Abnormal`.
    pub fn is_abnormal(&self) -> bool {
        self.verdict == Verdict::Abnormal
    }
}
