// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use clap::Parser;

use crashpin_arena::{AllocatorError, ArenaError};
use crashpin_config::ConfigError;
use crashpin_supervisor::SupervisorError;
use crashpin_upload::TransportError;

use crate::cli::Cli;
use crate::error::AppError;
use crate::exit::{ExitCode, parse_failure};

#[test]
fn test_code_values() {
    let codes = [
        ExitCode::Normal,
        ExitCode::OptionsParse,
        ExitCode::ArenaInit,
        ExitCode::AllocatorInstall,
        ExitCode::TransportInit,
        ExitCode::SignalInit,
        ExitCode::SignalWait,
        ExitCode::ExecFailure,
        ExitCode::Unreachable,
    ];

    for (expected, code) in codes.into_iter().enumerate() {
        assert_eq!(usize::from(code.code()), expected);
    }
}

#[test]
fn test_app_error_codes() {
    let io = || std::io::Error::from(std::io::ErrorKind::Other);

    assert_eq!(
        AppError::from(ConfigError::NoFiles).exit_code(),
        ExitCode::OptionsParse
    );
    assert_eq!(
        AppError::from(ArenaError::Lock { errno: 12 }).exit_code(),
        ExitCode::ArenaInit
    );
    assert_eq!(
        AppError::from(AllocatorError::AlreadyInstalled).exit_code(),
        ExitCode::AllocatorInstall
    );
    assert_eq!(
        AppError::Transport(TransportError::Runtime(io())).exit_code(),
        ExitCode::TransportInit
    );
    assert_eq!(
        AppError::from(SupervisorError::SignalInit(io())).exit_code(),
        ExitCode::SignalInit
    );
    assert_eq!(AppError::SignalInit(io()).exit_code(), ExitCode::SignalInit);
    assert_eq!(AppError::SignalWait.exit_code(), ExitCode::SignalWait);
    assert_eq!(
        AppError::from(SupervisorError::Exec {
            program: "nope".into(),
            source: io(),
        })
        .exit_code(),
        ExitCode::ExecFailure
    );
    assert_eq!(
        AppError::UnexpectedSignal(10).exit_code(),
        ExitCode::Unreachable
    );
}

#[test]
fn test_parse_failure_codes() {
    let help = Cli::try_parse_from(["crashpin", "--help"]).expect_err("Failed to display help");
    let version =
        Cli::try_parse_from(["crashpin", "--version"]).expect_err("Failed to display version");
    let bogus = Cli::try_parse_from(["crashpin", "-n"]).expect_err("Failed to reject args");

    assert_eq!(parse_failure(&help), ExitCode::Normal);
    assert_eq!(parse_failure(&version), ExitCode::Normal);
    assert_eq!(parse_failure(&bogus), ExitCode::OptionsParse);
}
