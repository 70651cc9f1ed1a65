// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::process::{Command, Output};

fn crashpin(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crashpin"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to output()")
}

fn daemon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crashpin-daemon"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to output()")
}

#[test]
fn test_help_exits_zero() {
    let output = crashpin(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("--header"));
    assert!(help.contains("Plain HTTP uploads are not bounded"));
}

#[test]
fn test_daemon_help_exits_zero() {
    assert_eq!(daemon(&["--help"]).status.code(), Some(0));
}

#[test]
fn test_unknown_option_exits_one() {
    assert_eq!(crashpin(&["--bogus"]).status.code(), Some(1));
}

#[test]
fn test_missing_url_exits_one() {
    assert_eq!(crashpin(&["-f", "/tmp/core", "true"]).status.code(), Some(1));
}

#[test]
fn test_missing_program_exits_one() {
    assert_eq!(
        crashpin(&["-u", "http://127.0.0.1:1/", "-f", "/tmp/core"])
            .status
            .code(),
        Some(1)
    );
}

#[test]
fn test_invalid_header_exits_one() {
    assert_eq!(
        crashpin(&["-u", "http://127.0.0.1:1/", "-f", "/c", "-h", "nocolon", "true"])
            .status
            .code(),
        Some(1)
    );
}

#[test]
fn test_small_arena_exits_one() {
    assert_eq!(
        crashpin(&["-u", "http://127.0.0.1:1/", "-f", "/c", "-s", "1024", "true"])
            .status
            .code(),
        Some(1)
    );
}

#[test]
fn test_unmappable_arena_exits_two() {
    let size = (usize::MAX / 2).to_string();

    assert_eq!(
        crashpin(&["-u", "http://127.0.0.1:1/", "-f", "/c", "-s", &size, "true"])
            .status
            .code(),
        Some(2)
    );
}
