// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::outcome::{ChildOutcome, Termination, Verdict};

// =============================================================================
// from_status()
// =============================================================================

#[cfg(unix)]
#[test]
fn test_from_status_decodes_raw_wait_status() {
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    assert_eq!(
        ChildOutcome::from_status(ExitStatus::from_raw(0)),
        ChildOutcome::Exited(0)
    );
    assert_eq!(
        ChildOutcome::from_status(ExitStatus::from_raw(3 << 8)),
        ChildOutcome::Exited(3)
    );
    assert_eq!(
        ChildOutcome::from_status(ExitStatus::from_raw(libc::SIGSEGV)),
        ChildOutcome::Signaled(libc::SIGSEGV)
    );
}

// =============================================================================
// is_abnormal() / exit_code()
// =============================================================================

#[test]
fn test_only_zero_exit_is_normal() {
    assert!(!ChildOutcome::Exited(0).is_abnormal());
    assert!(ChildOutcome::Exited(1).is_abnormal());
    assert!(ChildOutcome::Exited(137).is_abnormal());
    assert!(ChildOutcome::Signaled(9).is_abnormal());
    assert!(ChildOutcome::Unknown.is_abnormal());
}

#[test]
fn test_exit_code() {
    assert_eq!(ChildOutcome::Exited(0).exit_code(), 0);
    assert_eq!(ChildOutcome::Exited(42).exit_code(), 42);
    assert_eq!(ChildOutcome::Signaled(11).exit_code(), 139);
    assert_eq!(ChildOutcome::Unknown.exit_code(), 1);
}

#[test]
fn test_termination_verdict() {
    assert_eq!(
        Termination::new(ChildOutcome::Exited(0), None).verdict,
        Verdict::Normal
    );

    let termination = Termination::new(ChildOutcome::Signaled(15), Some(15));
    assert_eq!(termination.verdict, Verdict::Abnormal);
    assert!(termination.is_abnormal());
    assert_eq!(termination.forwarded, Some(15));
}
