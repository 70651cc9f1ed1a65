// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Signal-driven upload for the `crashpin-daemon` binary.

use tokio::runtime::{Builder, Runtime};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::info;

use crashpin_arena::PinnedAllocator;
use crashpin_config::Configuration;
use crashpin_upload::HttpTransport;

use crate::app::{PinnedMemory, upload};
use crate::error::AppError;

/// What the daemon does after a signal.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DaemonAction {
    /// SIGUSR1: upload every file, then exit.
    UploadThenShutdown,
    /// SIGTERM: exit.
    Shutdown,
}

impl DaemonAction {
    /// Action for a signal of the waited-for set; `None` for any other.
    pub fn for_signal(signum: i32) -> Option<Self> {
        match signum {
            libc::SIGUSR1 => Some(Self::UploadThenShutdown),
            libc::SIGTERM => Some(Self::Shutdown),
            _ => None,
        }
    }
}

/// Waits for SIGTERM or SIGUSR1.
pub struct SignalWaiter {
    runtime: Runtime,
    terminate: Signal,
    user_defined: Signal,
}

impl SignalWaiter {
    /// Registers both handlers. Must run before any pinned scope opens.
    pub fn new() -> Result<Self, AppError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::SignalInit)?;

        let (terminate, user_defined) = {
            let _context = runtime.enter();
            (
                signal(SignalKind::terminate()).map_err(AppError::SignalInit)?,
                signal(SignalKind::user_defined1()).map_err(AppError::SignalInit)?,
            )
        };

        Ok(Self {
            runtime,
            terminate,
            user_defined,
        })
    }

    /// Blocks until one of the signals arrives and returns its number.
    pub fn wait(&mut self) -> Result<i32, AppError> {
        let Self {
            runtime,
            terminate,
            user_defined,
        } = self;

        runtime.block_on(async {
            tokio::select! {
                Some(()) = terminate.recv() => Ok(libc::SIGTERM),
                Some(()) = user_defined.recv() => Ok(libc::SIGUSR1),
                else => Err(AppError::SignalWait),
            }
        })
    }
}

/// Waits for a signal, uploads on SIGUSR1, and returns.
pub fn serve(config: &Configuration, allocator: &'static PinnedAllocator) -> Result<(), AppError> {
    let memory = PinnedMemory::acquire(allocator, config.arena_size())?;
    let result = serve_pinned(config, &memory);

    memory.release();

    result
}

fn serve_pinned(config: &Configuration, memory: &PinnedMemory) -> Result<(), AppError> {
    let mut waiter = SignalWaiter::new()?;
    let transport =
        HttpTransport::new(config, Some(memory.allocator())).map_err(AppError::Transport)?;

    info!("Waiting for signal");
    let signum = waiter.wait()?;

    match DaemonAction::for_signal(signum) {
        Some(DaemonAction::UploadThenShutdown) => {
            info!(signal = signum, "Upload requested");
            upload(config, transport);
        }
        Some(DaemonAction::Shutdown) => {
            info!(signal = signum, "Shutdown requested");
        }
        None => return Err(AppError::UnexpectedSignal(signum)),
    }

    info!("Terminating");

    Ok(())
}
