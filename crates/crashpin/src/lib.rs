// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # crashpin
//!
//! Runs a program and, if it dies abnormally, uploads its crash artifacts
//! over HTTP(S) with every byte of transport state held in `mlock`ed memory.
//!
//! Two binaries share this library:
//!
//! - `crashpin`: supervise `PROGRAM [ARG ...]`, upload after an abnormal exit,
//!   exit with the child's status
//! - `crashpin-daemon`: wait for SIGTERM or SIGUSR1, upload on SIGUSR1, exit
//!
//! Both must declare [`PinnedAllocator`](crashpin_arena::PinnedAllocator) as
//! their `#[global_allocator]` and hand it to [`supervise`] or [`serve`].
//!
//! ## Startup order
//!
//! 1. logging, option parsing, validation
//! 2. pinned arena, allocator install
//! 3. signal registration (outside any pinned scope)
//! 4. HTTP transport (inside the pinned scope)
//!
//! Every fatal step maps onto a dedicated [`ExitCode`].

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

pub mod cli;
pub mod exit;
pub mod logging;

mod error;

#[cfg(unix)]
mod app;
#[cfg(unix)]
mod daemon;

#[cfg(unix)]
pub use app::{PinnedMemory, supervise, upload};
pub use cli::{Cli, DaemonCli, UploadArgs};
#[cfg(unix)]
pub use daemon::{DaemonAction, SignalWaiter, serve};
pub use error::AppError;
pub use exit::ExitCode;
