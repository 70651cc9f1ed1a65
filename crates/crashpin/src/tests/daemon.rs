// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::daemon::DaemonAction;

#[test]
fn test_usr1_uploads_then_shuts_down() {
    assert_eq!(
        DaemonAction::for_signal(libc::SIGUSR1),
        Some(DaemonAction::UploadThenShutdown)
    );
}

#[test]
fn test_term_shuts_down() {
    assert_eq!(
        DaemonAction::for_signal(libc::SIGTERM),
        Some(DaemonAction::Shutdown)
    );
}

#[test]
fn test_other_signals_are_unexpected() {
    assert_eq!(DaemonAction::for_signal(libc::SIGHUP), None);
    assert_eq!(DaemonAction::for_signal(libc::SIGINT), None);
}
