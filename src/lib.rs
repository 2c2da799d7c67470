//! Configuration registry for shell helper tooling.
//!
//! A key/value store with typed validation, provenance tracking and
//! per-key locks, loaded from `UTIL_CONFIG_*` environment variables and
//! `key=value` files and exported as files, shell `export` lines, or JSON.
//!
//! - **[`config`]** — the registry, its loaders, exporters and built-in catalog
//! - **[`error`]** — typed errors returned by registry operations
//! - **[`logging`]** — tracing subscriber used by the `util-config` binary
//! - **[`cli`]** / **[`commands`]** — command-line definition and subcommands for the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
