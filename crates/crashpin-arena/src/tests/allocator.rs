// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for PinnedAllocator, driven through the GlobalAlloc methods
//! directly so the test harness keeps the system allocator.

use core::alloc::{GlobalAlloc, Layout};

use serial_test::serial;

use crate::allocator::{AllocatorStats, PinnedAllocator};
use crate::arena::{MAX_ALIGN, PinnedArena};
use crate::error::AllocatorError;

const ARENA_SIZE: usize = 16 * 1024;

fn leaked_arena(capacity: usize) -> &'static PinnedArena {
    Box::leak(Box::new(
        PinnedArena::init(capacity).expect("Failed to init()"),
    ))
}

fn layout(size: usize) -> Layout {
    Layout::from_size_align(size, 8).expect("Failed to Layout::from_size_align()")
}

// =============================================================================
// install()
// =============================================================================

#[test]
#[serial(arena)]
fn test_install_once() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    let other = leaked_arena(ARENA_SIZE);

    assert!(!ALLOCATOR.is_installed());
    ALLOCATOR.install(arena).expect("Failed to install()");
    assert!(ALLOCATOR.is_installed());

    assert_eq!(
        ALLOCATOR.install(other),
        Err(AllocatorError::AlreadyInstalled)
    );

    ALLOCATOR.uninstall();
    assert_eq!(
        ALLOCATOR.install(other),
        Err(AllocatorError::AlreadyInstalled)
    );

    arena.destroy().expect("Failed to destroy()");
    other.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_install_rejects_destroyed_arena() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);

    arena.destroy().expect("Failed to destroy()");

    assert_eq!(
        ALLOCATOR.install(arena),
        Err(AllocatorError::ArenaDestroyed)
    );
    assert!(!ALLOCATOR.is_installed());
}

// =============================================================================
// alloc() / alloc_zeroed()
// =============================================================================

#[test]
#[serial(arena)]
fn test_alloc_without_arena_uses_system() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let _scope = ALLOCATOR.enter();

    let ptr = unsafe { ALLOCATOR.alloc(layout(64)) };

    assert!(!ptr.is_null());
    assert!(!ALLOCATOR.owns(ptr));
    assert_eq!(ALLOCATOR.remaining(), 0);

    unsafe { ALLOCATOR.dealloc(ptr, layout(64)) };
}

#[test]
#[serial(arena)]
fn test_alloc_routes_by_scope() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let outside = unsafe { ALLOCATOR.alloc(layout(32)) };
    assert!(!arena.contains(outside));

    let inside = {
        let _scope = ALLOCATOR.enter();
        unsafe { ALLOCATOR.alloc(layout(32)) }
    };
    assert!(arena.contains(inside));
    assert!(ALLOCATOR.owns(inside));

    let after = unsafe { ALLOCATOR.alloc(layout(32)) };
    assert!(!arena.contains(after));

    unsafe {
        ALLOCATOR.dealloc(outside, layout(32));
        ALLOCATOR.dealloc(after, layout(32));
        ALLOCATOR.dealloc(inside, layout(32));
    }

    assert_eq!(
        ALLOCATOR.stats(),
        AllocatorStats {
            allocations: 1,
            exhaustions: 0,
            releases: 1,
        }
    );

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_nested_scopes() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let outer = ALLOCATOR.enter();
    {
        let _inner = ALLOCATOR.enter();
    }

    let still_pinned = unsafe { ALLOCATOR.alloc(layout(16)) };
    assert!(arena.contains(still_pinned));

    drop(outer);

    let unpinned = unsafe { ALLOCATOR.alloc(layout(16)) };
    assert!(!arena.contains(unpinned));

    unsafe { ALLOCATOR.dealloc(unpinned, layout(16)) };

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_scope_is_per_thread() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let _scope = ALLOCATOR.enter();

    let address = std::thread::spawn(|| {
        let ptr = unsafe { ALLOCATOR.alloc(layout(16)) };
        let address = ptr as usize;
        unsafe { ALLOCATOR.dealloc(ptr, layout(16)) };
        address
    })
    .join()
    .expect("Failed to join()");

    assert!(!arena.contains(address as *const u8));

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_alloc_honours_layout_alignment() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let _scope = ALLOCATOR.enter();
    let wide =
        Layout::from_size_align(64, 4 * MAX_ALIGN).expect("Failed to Layout::from_size_align()");

    unsafe { ALLOCATOR.alloc(layout(1)) };
    let ptr = unsafe { ALLOCATOR.alloc(wide) };

    assert!(arena.contains(ptr));
    assert_eq!(ptr as usize % (4 * MAX_ALIGN), 0);

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_alloc_zeroed_in_arena() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let ptr = {
        let _scope = ALLOCATOR.enter();
        unsafe { ALLOCATOR.alloc_zeroed(layout(256)) }
    };
    let bytes = unsafe { core::slice::from_raw_parts(ptr, 256) };

    assert!(arena.contains(ptr));
    assert!(bytes.iter().all(|&b| b == 0));

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_alloc_exhaustion_returns_null() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(1024);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let _scope = ALLOCATOR.enter();

    let first = unsafe { ALLOCATOR.alloc(layout(600)) };
    let second = unsafe { ALLOCATOR.alloc(layout(600)) };

    assert!(!first.is_null());
    assert!(second.is_null());
    assert_eq!(ALLOCATOR.stats().allocations, 1);
    assert_eq!(ALLOCATOR.stats().exhaustions, 1);

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

// =============================================================================
// realloc()
// =============================================================================

#[test]
#[serial(arena)]
fn test_realloc_arena_block_stays_in_arena_outside_scope() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let ptr = {
        let _scope = ALLOCATOR.enter();
        unsafe { ALLOCATOR.alloc(layout(8)) }
    };
    unsafe { core::ptr::copy_nonoverlapping(b"pinned!!".as_ptr(), ptr, 8) };

    let grown = unsafe { ALLOCATOR.realloc(ptr, layout(8), 128) };
    let bytes = unsafe { core::slice::from_raw_parts(grown, 8) };

    assert!(arena.contains(grown));
    assert_eq!(bytes, b"pinned!!");

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(arena)]
fn test_realloc_system_block_stays_in_system_inside_scope() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let ptr = unsafe { ALLOCATOR.alloc(layout(8)) };

    let grown = {
        let _scope = ALLOCATOR.enter();
        unsafe { ALLOCATOR.realloc(ptr, layout(8), 4096) }
    };

    assert!(!grown.is_null());
    assert!(!arena.contains(grown));
    assert_eq!(arena.used(), 0);

    unsafe { ALLOCATOR.dealloc(grown, layout(4096)) };

    ALLOCATOR.uninstall();
    arena.destroy().expect("Failed to destroy()");
}

// =============================================================================
// uninstall()
// =============================================================================

#[test]
#[serial(arena)]
fn test_uninstall_keeps_blocks_recognised() {
    static ALLOCATOR: PinnedAllocator = PinnedAllocator::new();
    let arena = leaked_arena(ARENA_SIZE);
    ALLOCATOR.install(arena).expect("Failed to install()");

    let _scope = ALLOCATOR.enter();
    let ptr = unsafe { ALLOCATOR.alloc(layout(32)) };

    ALLOCATOR.uninstall();

    let fresh = unsafe { ALLOCATOR.alloc(layout(32)) };
    assert!(!arena.contains(fresh));
    assert!(ALLOCATOR.owns(ptr));

    unsafe {
        ALLOCATOR.dealloc(ptr, layout(32));
        ALLOCATOR.dealloc(fresh, layout(32));
    }

    assert_eq!(ALLOCATOR.stats().releases, 1);
    assert_eq!(ALLOCATOR.remaining(), 0);

    arena.destroy().expect("Failed to destroy()");
}
