// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PinnedAllocator - Routes scoped allocations into a [`PinnedArena`].
//!
//! Routing rules:
//! - `alloc` / `alloc_zeroed` go to the arena only while the calling thread
//!   holds a [`PinnedScope`] and an arena is installed.
//! - `realloc` follows the block: arena blocks grow in the arena (scope or
//!   not), system blocks grow in the system heap.
//! - `dealloc` of an arena block is a no-op.
//!
//! After `uninstall()` the arena's address range is still recognised, so a
//! block that outlived the arena is never passed to the system allocator.

use core::alloc::{GlobalAlloc, Layout};
use core::cell::Cell;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use core::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::alloc::System;

use crate::arena::PinnedArena;
use crate::error::AllocatorError;

thread_local! {
    static PINNED_DEPTH: Cell<usize> = const { Cell::new(0) };
}

fn scope_depth() -> usize {
    PINNED_DEPTH.try_with(Cell::get).unwrap_or(0)
}

/// Guard returned by [`PinnedAllocator::enter`].
///
/// While at least one guard is alive on a thread, fresh allocations made by
/// that thread are served from the pinned arena. Guards nest and are bound to
/// the thread that created them.
#[must_use = "allocations are only pinned while the scope is alive"]
pub struct PinnedScope {
    _not_send: PhantomData<*const ()>,
}

impl Drop for PinnedScope {
    fn drop(&mut self) {
        let _ = PINNED_DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Snapshot of [`PinnedAllocator`] counters.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct AllocatorStats {
    /// Blocks served from the arena.
    pub allocations: usize,
    /// Arena requests that could not be served.
    pub exhaustions: usize,
    /// Arena blocks handed back (no-ops).
    pub releases: usize,
}

/// A [`GlobalAlloc`] that can host a [`PinnedArena`].
///
/// Until an arena is installed every call forwards to [`System`].
pub struct PinnedAllocator {
    arena: AtomicPtr<PinnedArena>,
    range_start: AtomicUsize,
    range_end: AtomicUsize,
    allocations: AtomicUsize,
    exhaustions: AtomicUsize,
    releases: AtomicUsize,
}

impl Default for PinnedAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PinnedAllocator {
    /// Creates an allocator with no arena installed.
    pub const fn new() -> Self {
        Self {
            arena: AtomicPtr::new(ptr::null_mut()),
            range_start: AtomicUsize::new(0),
            range_end: AtomicUsize::new(0),
            allocations: AtomicUsize::new(0),
            exhaustions: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// Installs `arena` as the target of scoped allocations.
    ///
    /// An allocator hosts at most one arena in its lifetime.
    pub fn install(&self, arena: &'static PinnedArena) -> Result<(), AllocatorError> {
        let base = arena.base() as usize;

        if base == 0 {
            return Err(AllocatorError::ArenaDestroyed);
        }

        self.range_start
            .compare_exchange(0, base, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AllocatorError::AlreadyInstalled)?;

        self.range_end
            .store(base + arena.capacity(), Ordering::Release);
        self.arena.store(
            arena as *const PinnedArena as *mut PinnedArena,
            Ordering::Release,
        );

        Ok(())
    }

    /// Stops serving new blocks from the arena.
    ///
    /// Must run before the arena is destroyed. Blocks already handed out keep
    /// being recognised; freeing them stays a no-op.
    pub fn uninstall(&self) {
        self.arena.store(ptr::null_mut(), Ordering::Release);
    }

    /// Returns true while an arena is installed.
    pub fn is_installed(&self) -> bool {
        !self.arena.load(Ordering::Acquire).is_null()
    }

    /// Opens a pinned scope on the current thread.
    pub fn enter(&self) -> PinnedScope {
        let _ = PINNED_DEPTH.try_with(|depth| depth.set(depth.get() + 1));

        PinnedScope {
            _not_send: PhantomData,
        }
    }

    /// Bytes left in the installed arena; zero when none is installed.
    pub fn remaining(&self) -> usize {
        self.installed().map_or(0, PinnedArena::remaining)
    }

    /// Returns true if `ptr` lies inside the range of the arena this
    /// allocator hosts or once hosted.
    pub fn owns(&self, ptr: *const u8) -> bool {
        let address = ptr as usize;
        let start = self.range_start.load(Ordering::Acquire);
        let end = self.range_end.load(Ordering::Acquire);

        start != 0 && address >= start && address < end
    }

    /// Counter snapshot.
    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            exhaustions: self.exhaustions.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
        }
    }

    fn installed(&self) -> Option<&PinnedArena> {
        // Safety: only `&'static PinnedArena` values are ever stored.
        unsafe { self.arena.load(Ordering::Acquire).as_ref() }
    }

    fn pinned_target(&self) -> Option<&PinnedArena> {
        if scope_depth() == 0 {
            return None;
        }

        self.installed()
    }

    fn record(&self, block: Option<NonNull<u8>>) -> *mut u8 {
        match block {
            Some(block) => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                block.as_ptr()
            }
            None => {
                self.exhaustions.fetch_add(1, Ordering::Relaxed);
                ptr::null_mut()
            }
        }
    }
}

unsafe impl GlobalAlloc for PinnedAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        match self.pinned_target() {
            Some(arena) => self.record(arena.allocate_aligned(layout.size(), layout.align())),
            None => unsafe { System.alloc(layout) },
        }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        match self.pinned_target() {
            // Arena bytes are never reused, so fresh blocks are already zero.
            Some(arena) => self.record(arena.allocate_aligned(layout.size(), layout.align())),
            None => unsafe { System.alloc_zeroed(layout) },
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if self.owns(ptr) {
            self.releases.fetch_add(1, Ordering::Relaxed);
            return;
        }

        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if !self.owns(ptr) {
            return unsafe { System.realloc(ptr, layout, new_size) };
        }

        let Some(arena) = self.installed() else {
            // The block belongs to a retired arena; there is nowhere valid to
            // copy it from once the mapping is gone.
            unsafe { libc::abort() }
        };

        // Safety: `ptr` is a live arena block of `layout.size()` bytes.
        let block = unsafe {
            arena.grow_aligned(
                NonNull::new(ptr),
                layout.size(),
                new_size,
                layout.align(),
            )
        };

        self.record(block)
    }
}
