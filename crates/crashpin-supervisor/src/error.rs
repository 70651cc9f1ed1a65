// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for crashpin-supervisor.
use thiserror::Error;

/// Startup faults. A child that runs and fails is an outcome, not an error.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The runtime or the SIGTERM handler could not be set up.
    #[error("failed to set up signal handling: {0}")]
    SignalInit(#[source] std::io::Error),

    /// The target program could not be started.
    #[error("failed to execute `{program}`: {source}")]
    Exec {
        /// Program as given.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration carries no program to supervise.
    #[error("no program to supervise")]
    NoCommand,
}
