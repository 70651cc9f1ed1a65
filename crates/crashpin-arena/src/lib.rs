// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Pinned memory for short-lived processes that handle credentials.
//!
//! This crate provides two pieces that are meant to be used together:
//!
//! ## PinnedArena
//!
//! A fixed-capacity bump allocator over a single anonymous mapping:
//! - Pages are `mlock`ed (never swapped to disk)
//! - Pages are excluded from core dumps (`MADV_DONTDUMP`, Linux)
//! - One coarse mutex guards the whole arena
//! - No reclamation: released blocks are never reused
//! - Zeroized, unlocked and unmapped on `destroy()`
//!
//! ## PinnedAllocator
//!
//! A [`GlobalAlloc`](core::alloc::GlobalAlloc) that serves fresh allocations
//! from an installed arena while the current thread holds a [`PinnedScope`].
//! Everything else goes to the system allocator. Block origin is sticky:
//! arena blocks grow inside the arena, system blocks stay in the system heap.
//!
//! # Example
//!
//! ```rust,no_run
//! use crashpin_arena::{PinnedAllocator, PinnedArena};
//!
//! #[global_allocator]
//! static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let arena: &'static PinnedArena = Box::leak(Box::new(PinnedArena::init(1024 * 1024)?));
//!     ALLOCATOR.install(arena)?;
//!
//!     {
//!         let _scope = ALLOCATOR.enter();
//!         let secret = String::from("Authorization: Bearer ...");
//!         assert!(arena.contains(secret.as_ptr()));
//!     }
//!
//!     ALLOCATOR.uninstall();
//!     arena.destroy()?;
//!     Ok(())
//! }
//! ```
//!
//! # Exhaustion
//!
//! [`PinnedArena`] reports exhaustion as an empty result. Behind the global
//! allocator that becomes a null pointer, which Rust turns into an abort, so
//! callers that can predict their footprint should check
//! [`PinnedAllocator::remaining`] first.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

#[cfg(unix)]
mod allocator;
#[cfg(unix)]
mod arena;

mod error;

#[cfg(unix)]
pub use allocator::{AllocatorStats, PinnedAllocator, PinnedScope};
#[cfg(unix)]
pub use arena::{MAX_ALIGN, PinnedArena, realign};

pub use error::{AllocatorError, ArenaError};
