// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for crashpin.
use thiserror::Error;

use crashpin_arena::{AllocatorError, ArenaError};
use crashpin_config::ConfigError;
use crashpin_supervisor::SupervisorError;
use crashpin_upload::TransportError;

use crate::exit::ExitCode;

/// Fatal startup and runtime failures of the binaries.
#[derive(Debug, Error)]
pub enum AppError {
    /// Options failed validation.
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),

    /// The pinned arena could not be created.
    #[error("pinned arena initialization failed: {0}")]
    Arena(#[from] ArenaError),

    /// The allocator refused the arena.
    #[error("allocator install failed: {0}")]
    Install(#[from] AllocatorError),

    /// The HTTP transport could not be created.
    #[error("transport initialization failed: {0}")]
    Transport(#[source] TransportError),

    /// The supervisor failed to set up or to start the child.
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// Signal registration failed.
    #[error("failed to register signal handlers: {0}")]
    SignalInit(#[source] std::io::Error),

    /// The signal streams closed before any signal arrived.
    #[error("signal wait failed")]
    SignalWait,

    /// A signal outside the waited-for set was reported.
    #[error("unexpected signal {0}")]
    UnexpectedSignal(i32),
}

impl AppError {
    /// The process exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::OptionsParse,
            Self::Arena(_) => ExitCode::ArenaInit,
            Self::Install(_) => ExitCode::AllocatorInstall,
            Self::Transport(_) => ExitCode::TransportInit,
            Self::Supervisor(SupervisorError::SignalInit(_)) | Self::SignalInit(_) => {
                ExitCode::SignalInit
            }
            Self::Supervisor(SupervisorError::Exec { .. }) => ExitCode::ExecFailure,
            Self::Supervisor(SupervisorError::NoCommand) => ExitCode::OptionsParse,
            Self::SignalWait => ExitCode::SignalWait,
            Self::UnexpectedSignal(_) => ExitCode::Unreachable,
        }
    }
}
