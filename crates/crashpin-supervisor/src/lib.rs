// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Child process supervision.
//!
//! [`ProcessSupervisor`] starts the target program, waits for it, forwards a
//! SIGTERM received meanwhile, and classifies the result:
//!
//! - exited with status 0: [`Verdict::Normal`]
//! - anything else (non-zero status, killed by a signal, unknown): [`Verdict::Abnormal`],
//!   followed by the configured quiesce pause
//!
//! The SIGTERM handler is registered when the supervisor is constructed, so
//! build it before anything that opens a pinned allocation scope.

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod error;
mod outcome;
mod signal;
#[cfg(unix)]
mod supervisor;

pub use error::SupervisorError;
pub use outcome::{ChildOutcome, Termination, Verdict};
pub use signal::TerminationSignal;
#[cfg(unix)]
pub use supervisor::ProcessSupervisor;
