// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::path::PathBuf;

use crate::configuration::{CertificateSource, TargetCommand};

// =============================================================================
// CertificateSource::parse()
// =============================================================================

#[test]
fn test_certificate_inline_pem() {
    let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    assert_eq!(
        CertificateSource::parse(pem),
        CertificateSource::Pem(pem.to_owned())
    );
}

#[test]
fn test_certificate_path() {
    assert_eq!(
        CertificateSource::parse("/etc/crashpin/ca.pem"),
        CertificateSource::File(PathBuf::from("/etc/crashpin/ca.pem"))
    );
}

// =============================================================================
// TargetCommand
// =============================================================================

#[test]
fn test_target_command_accessors() {
    let command = TargetCommand::new("/bin/sh", ["-c", "exit 3"]);

    assert_eq!(command.program(), "/bin/sh");
    assert_eq!(command.args(), ["-c", "exit 3"]);
}
