// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Validated, immutable configuration shared by every crashpin component.
//!
//! Raw values (usually straight from the command line) go into a
//! [`ConfigurationBuilder`]; [`ConfigurationBuilder::build`] checks them and
//! returns a [`Configuration`] or the first [`ConfigError`] found.
//!
//! ```rust
//! use crashpin_config::Configuration;
//!
//! let config = Configuration::builder()
//!     .url("https://dumps.example.com/upload")
//!     .file("/var/crash/core")
//!     .header("Authorization: Bearer abc")
//!     .command(["/usr/bin/service", "--foreground"])
//!     .program_required(true)
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.method(), http::Method::PUT);
//! assert_eq!(config.max_attempts(), 3);
//! ```

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod builder;
mod configuration;
mod error;

pub use builder::ConfigurationBuilder;
pub use configuration::{
    CertificateSource, Configuration, DEFAULT_ARENA_SIZE, DEFAULT_LIMIT, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_METHOD, DEFAULT_QUIESCE, Limits, MIN_ARENA_SIZE, TargetCommand,
};
pub use error::ConfigError;
