// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The supervise-then-upload pipeline behind the `crashpin` binary.

use tracing::{debug, error, info, warn};

use crashpin_arena::{PinnedAllocator, PinnedArena};
use crashpin_config::Configuration;
use crashpin_supervisor::ProcessSupervisor;
use crashpin_upload::{HttpTransport, Transport, UploadEngine, UploadTask};

use crate::error::AppError;

/// A pinned arena installed behind the global allocator.
///
/// Release it with [`release`](Self::release) once nothing allocated inside
/// a pinned scope is alive anymore. Every thread that opened a scope must
/// have exited by then: its thread-local state may live in the arena and is
/// torn down at thread exit. [`HttpTransport`] keeps its scope on its own
/// worker thread and joins it on drop, so dropping the transport first is
/// enough.
pub struct PinnedMemory {
    allocator: &'static PinnedAllocator,
    arena: &'static PinnedArena,
}

impl PinnedMemory {
    /// Maps and locks `size` bytes and installs them in `allocator`.
    pub fn acquire(allocator: &'static PinnedAllocator, size: usize) -> Result<Self, AppError> {
        let arena = PinnedArena::init(size)?;
        let capacity = arena.capacity();

        // The arena must outlive every block it hands out.
        let arena: &'static PinnedArena = Box::leak(Box::new(arena));

        if let Err(error) = allocator.install(arena) {
            let _ = arena.destroy();
            return Err(error.into());
        }

        info!(capacity, "Pinned arena ready");

        Ok(Self { allocator, arena })
    }

    /// The allocator hosting the arena.
    pub fn allocator(&self) -> &'static PinnedAllocator {
        self.allocator
    }

    /// The installed arena.
    pub fn arena(&self) -> &'static PinnedArena {
        self.arena
    }

    /// Uninstalls and destroys the arena.
    pub fn release(self) {
        let stats = self.allocator.stats();
        debug!(
            used = self.arena.used(),
            allocations = stats.allocations,
            releases = stats.releases,
            exhaustions = stats.exhaustions,
            "Releasing pinned arena"
        );

        self.allocator.uninstall();

        if let Err(error) = self.arena.destroy() {
            error!(error = %error, "Failed to destroy pinned arena");
        }
    }
}

/// Uploads every configured file through `transport` and returns how many
/// succeeded. A shortfall is logged, not reported as an error.
pub fn upload<T: Transport>(config: &Configuration, transport: T) -> usize {
    let mut tasks = UploadTask::from_paths(config.files());
    let mut engine = UploadEngine::new(transport, config.max_attempts());

    let uploaded = engine.upload_all(&mut tasks);

    if uploaded < tasks.len() {
        warn!(uploaded, total = tasks.len(), "Not every file was uploaded");
    }

    uploaded
}

/// Supervises the configured program and uploads after an abnormal end.
///
/// Returns the child-derived exit status.
pub fn supervise(
    config: &Configuration,
    allocator: &'static PinnedAllocator,
) -> Result<i32, AppError> {
    let memory = PinnedMemory::acquire(allocator, config.arena_size())?;
    let result = supervise_pinned(config, &memory);

    memory.release();

    result
}

fn supervise_pinned(config: &Configuration, memory: &PinnedMemory) -> Result<i32, AppError> {
    let mut supervisor = ProcessSupervisor::from_configuration(config)?;
    let transport =
        HttpTransport::new(config, Some(memory.allocator())).map_err(AppError::Transport)?;

    let termination = supervisor.run()?;

    if termination.is_abnormal() {
        info!(files = config.files().len(), "Uploading files");
        upload(config, transport);
    }

    let code = termination.outcome.exit_code();
    info!(code, "Terminating");

    Ok(code)
}
