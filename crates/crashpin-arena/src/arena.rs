// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PinnedArena - Bump allocator over one mlock'd mapping.
//!
//! The arena lives for the whole process: one `init`, one `destroy`, no
//! resize. Every block is carved at the current offset, which only moves
//! forward. Released blocks are never handed out again.

use core::ptr::{self, NonNull};
use std::sync::{Mutex, MutexGuard, PoisonError};

use zeroize::Zeroize;

use crate::error::ArenaError;

/// The platform's maximum fundamental alignment (`alignof(max_align_t)`).
pub const MAX_ALIGN: usize = core::mem::align_of::<libc::max_align_t>();

/// Rounds `size` up to the next multiple of [`MAX_ALIGN`].
///
/// Returns `None` if the rounded size does not fit in `usize`.
#[inline]
pub const fn realign(size: usize) -> Option<usize> {
    match size.checked_add(MAX_ALIGN - 1) {
        Some(padded) => Some(padded & !(MAX_ALIGN - 1)),
        None => None,
    }
}

fn last_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

struct ArenaState {
    base: *mut u8,
    capacity: usize,
    used: usize,
}

// Safety: the raw base pointer is only dereferenced under the arena mutex or
// through blocks handed out to a single owner.
unsafe impl Send for ArenaState {}

impl ArenaState {
    const fn empty() -> Self {
        Self {
            base: ptr::null_mut(),
            capacity: 0,
            used: 0,
        }
    }
}

/// Fixed-capacity, lock-protected bump allocator over pinned memory.
pub struct PinnedArena {
    state: Mutex<ArenaState>,
}

impl PinnedArena {
    /// Maps at least `min_capacity` bytes, locks them in RAM and excludes them
    /// from core dumps.
    ///
    /// The capacity is rounded up to [`MAX_ALIGN`]. Any syscall failure unmaps
    /// whatever was mapped and is reported; the caller is expected to treat it
    /// as fatal.
    pub fn init(min_capacity: usize) -> Result<Self, ArenaError> {
        let capacity = match realign(min_capacity) {
            Some(capacity) if capacity > 0 => capacity,
            _ => return Err(ArenaError::InvalidCapacity),
        };

        let base = unsafe {
            libc::mmap(
                ptr::null_mut(),
                capacity,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if base == libc::MAP_FAILED {
            return Err(ArenaError::Map {
                errno: last_errno(),
            });
        }

        if unsafe { libc::mlock(base as *const libc::c_void, capacity) } != 0 {
            let errno = last_errno();
            unsafe { libc::munmap(base, capacity) };
            return Err(ArenaError::Lock { errno });
        }

        #[cfg(target_os = "linux")]
        if unsafe { libc::madvise(base, capacity, libc::MADV_DONTDUMP) } != 0 {
            let errno = last_errno();
            unsafe {
                libc::munlock(base as *const libc::c_void, capacity);
                libc::munmap(base, capacity);
            }
            return Err(ArenaError::Madvise { errno });
        }

        Ok(Self {
            state: Mutex::new(ArenaState {
                base: base as *mut u8,
                capacity,
                used: 0,
            }),
        })
    }

    fn inspect(&self) -> MutexGuard<'_, ArenaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a block of at least `size` bytes aligned to [`MAX_ALIGN`], or
    /// `None` if the arena is exhausted.
    #[inline]
    pub fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        self.allocate_aligned(size, MAX_ALIGN)
    }

    /// Returns a block of at least `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two; alignments below [`MAX_ALIGN`] are
    /// raised to it. On exhaustion nothing is consumed and `None` is returned.
    pub fn allocate_aligned(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        if !align.is_power_of_two() {
            return None;
        }

        let mut state = self.state.lock().ok()?;

        if state.base.is_null() {
            return None;
        }

        let size = realign(size)?;
        let align = align.max(MAX_ALIGN);
        let base = state.base as usize;

        let cursor = base.checked_add(state.used)?;
        let start = cursor.checked_add(align - 1)? & !(align - 1);
        let offset = start - base;
        let end = offset.checked_add(size)?;

        if end > state.capacity {
            return None;
        }

        state.used = end;

        NonNull::new(unsafe { state.base.add(offset) })
    }

    /// `malloc`-shaped: a zero-byte request is empty and never takes the lock.
    #[inline]
    pub fn malloc(&self, size: usize) -> Option<NonNull<u8>> {
        self.malloc_aligned(size, MAX_ALIGN)
    }

    fn malloc_aligned(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            return None;
        }

        self.allocate_aligned(size, align)
    }

    /// `calloc`-shaped: `count * size` zeroed bytes.
    ///
    /// The mapping is anonymous and no byte is ever handed out twice, so every
    /// block is still in the zero-filled state the kernel committed it in.
    pub fn zero_allocate(&self, count: usize, size: usize) -> Option<NonNull<u8>> {
        self.malloc(count.checked_mul(size)?)
    }

    /// `realloc`-shaped: allocates a new block of `new_size` bytes and copies
    /// `min(old_size, new_size)` bytes from `ptr`.
    ///
    /// A null `ptr` or a zero `new_size` behaves as [`malloc`](Self::malloc).
    /// The old block is left in place.
    ///
    /// # Safety
    ///
    /// `ptr`, if present, must be valid for reads of `old_size` bytes.
    #[inline]
    pub unsafe fn grow(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        unsafe { self.grow_aligned(ptr, old_size, new_size, MAX_ALIGN) }
    }

    /// Same as [`grow`](Self::grow) with an explicit alignment for the new block.
    ///
    /// # Safety
    ///
    /// `ptr`, if present, must be valid for reads of `old_size` bytes.
    pub unsafe fn grow_aligned(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
        align: usize,
    ) -> Option<NonNull<u8>> {
        let source = match ptr {
            Some(source) if new_size != 0 => source,
            _ => return self.malloc_aligned(new_size, align),
        };

        let target = self.allocate_aligned(new_size, align)?;

        unsafe {
            ptr::copy_nonoverlapping(
                source.as_ptr() as *const u8,
                target.as_ptr(),
                old_size.min(new_size),
            );
        }

        Some(target)
    }

    /// `strdup`-shaped: copies `bytes` into a new block and NUL-terminates it.
    pub fn duplicate(&self, bytes: &[u8]) -> Option<NonNull<u8>> {
        let target = self.allocate(bytes.len().checked_add(1)?)?;

        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), target.as_ptr(), bytes.len());
            target.as_ptr().add(bytes.len()).write(0);
        }

        Some(target)
    }

    /// `free`-shaped: intentionally does nothing.
    ///
    /// The arena is single-shot; space comes back only when the process ends.
    #[inline]
    pub fn release(&self, ptr: *mut u8) {
        let _ = ptr;
    }

    /// Bytes handed out so far (aligned sizes plus alignment padding).
    pub fn used(&self) -> usize {
        self.inspect().used
    }

    /// Total capacity in bytes; zero once destroyed.
    pub fn capacity(&self) -> usize {
        self.inspect().capacity
    }

    /// Bytes still available at the current offset.
    pub fn remaining(&self) -> usize {
        let state = self.inspect();
        state.capacity - state.used
    }

    /// Start of the mapping; null once destroyed.
    pub fn base(&self) -> *const u8 {
        self.inspect().base
    }

    /// Returns true if `ptr` points inside the mapping.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let state = self.inspect();
        let base = state.base as usize;
        let address = ptr as usize;

        !state.base.is_null() && address >= base && address < base + state.capacity
    }

    /// Returns true once [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.inspect().base.is_null()
    }

    /// Zeroizes, unlocks and unmaps the region, then clears the bookkeeping.
    ///
    /// Idempotent: destroying an already destroyed arena is a no-op. Every
    /// block handed out becomes dangling, callers must have dropped them all.
    pub fn destroy(&self) -> Result<(), ArenaError> {
        let mut state = self.inspect();

        if state.base.is_null() {
            return Ok(());
        }

        let base = state.base;
        let capacity = state.capacity;

        unsafe { core::slice::from_raw_parts_mut(base, capacity) }.zeroize();

        let mut result = Ok(());

        if unsafe { libc::munlock(base as *const libc::c_void, capacity) } != 0 {
            result = Err(ArenaError::Unlock {
                errno: last_errno(),
            });
        }

        if unsafe { libc::munmap(base as *mut libc::c_void, capacity) } != 0 && result.is_ok() {
            result = Err(ArenaError::Unmap {
                errno: last_errno(),
            });
        }

        *state = ArenaState::empty();

        result
    }
}

impl Drop for PinnedArena {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}

impl core::fmt::Debug for PinnedArena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inspect();

        f.debug_struct("PinnedArena")
            .field("capacity", &state.capacity)
            .field("used", &state.used)
            .finish_non_exhaustive()
    }
}
