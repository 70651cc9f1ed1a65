// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for crashpin-arena.
use thiserror::Error;

fn os_error(errno: &i32) -> std::io::Error {
    std::io::Error::from_raw_os_error(*errno)
}

/// Errors from the arena's page syscalls.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ArenaError {
    /// The requested capacity is zero or overflows once realigned.
    #[error("invalid arena capacity")]
    InvalidCapacity,

    /// `mmap` could not reserve the region.
    #[error("mmap failed: {}", os_error(.errno))]
    Map {
        /// OS error number.
        errno: i32,
    },

    /// `mlock` could not pin the region (see `ulimit -l`).
    #[error("mlock failed: {}", os_error(.errno))]
    Lock {
        /// OS error number.
        errno: i32,
    },

    /// `madvise(MADV_DONTDUMP)` was refused.
    #[error("madvise(MADV_DONTDUMP) failed: {}", os_error(.errno))]
    Madvise {
        /// OS error number.
        errno: i32,
    },

    /// `munlock` failed during destroy.
    #[error("munlock failed: {}", os_error(.errno))]
    Unlock {
        /// OS error number.
        errno: i32,
    },

    /// `munmap` failed during destroy.
    #[error("munmap failed: {}", os_error(.errno))]
    Unmap {
        /// OS error number.
        errno: i32,
    },
}

/// Errors from installing an arena behind the global allocator.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocatorError {
    /// An arena was already installed in this allocator (retired ones count).
    #[error("an arena has already been installed")]
    AlreadyInstalled,

    /// The arena has been destroyed and has no backing memory.
    #[error("the arena has been destroyed")]
    ArenaDestroyed,
}
