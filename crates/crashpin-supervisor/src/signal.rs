// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Records that a termination signal was delivered, and which one.
///
/// Written once from the signal path, read by the supervising flow.
#[derive(Debug, Default)]
pub struct TerminationSignal {
    received: AtomicBool,
    signum: AtomicI32,
}

impl TerminationSignal {
    /// Nothing received yet.
    pub const fn new() -> Self {
        Self {
            received: AtomicBool::new(false),
            signum: AtomicI32::new(0),
        }
    }

    /// Stores `signum` and marks the signal as received.
    pub fn record(&self, signum: i32) {
        self.signum.store(signum, Ordering::Relaxed);
        self.received.store(true, Ordering::Release);
    }

    /// Returns true once a signal has been recorded.
    pub fn is_received(&self) -> bool {
        self.received.load(Ordering::Acquire)
    }

    /// The recorded signal number, if any.
    pub fn signum(&self) -> Option<i32> {
        self.is_received()
            .then(|| self.signum.load(Ordering::Relaxed))
    }
}
