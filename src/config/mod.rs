//! Typed key/value configuration registry.
//!
//! - [`registry`] — the store itself: register, get/set, lock, reset
//! - [`validation`] — type-intrinsic and pattern checks
//! - [`env`] — `UTIL_CONFIG_*` environment mapping
//! - [`file`] — `key=value` file loading, search path, and saving
//! - [`export`] — list/show and env/JSON export
//! - [`catalog`] — built-in keys and `init`
pub mod catalog;
pub mod env;
pub mod export;
pub mod file;
pub mod registry;
pub mod types;
pub mod validation;

pub use registry::{LoadReport, Registry};
pub use types::{Source, ValueType};
