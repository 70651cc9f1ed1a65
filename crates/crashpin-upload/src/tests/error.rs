// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::path::PathBuf;

use crate::error::{Recovery, TransportError, UploadError};

#[test]
fn test_transport_recovery() {
    assert_eq!(
        TransportError::Unavailable(503).recovery(),
        Recovery::Recoverable
    );
    assert_eq!(
        TransportError::Rejected(404).recovery(),
        Recovery::Unrecoverable
    );
    assert_eq!(
        TransportError::UnsupportedProtocol {
            scheme: "ftp".into()
        }
        .recovery(),
        Recovery::Unrecoverable
    );
    assert_eq!(
        TransportError::MalformedUrl {
            url: "::".into(),
            reason: "relative URL without a base".into(),
        }
        .recovery(),
        Recovery::Unrecoverable
    );
    assert_eq!(
        TransportError::OutOfMemory {
            needed: 2,
            remaining: 1
        }
        .recovery(),
        Recovery::Unrecoverable
    );
}

#[test]
fn test_upload_recovery() {
    let open = UploadError::Open {
        path: PathBuf::from("/missing"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };

    assert_eq!(open.recovery(), Recovery::Unrecoverable);
    assert_eq!(
        UploadError::from(TransportError::Unavailable(502)).recovery(),
        Recovery::Recoverable
    );
}

#[test]
fn test_out_of_memory_display() {
    let error = TransportError::OutOfMemory {
        needed: 300,
        remaining: 100,
    };

    assert_eq!(
        error.to_string(),
        "pinned arena too small for transfer: 300 bytes needed, 100 remaining"
    );
}
