//! Domain-specific error types for the configuration registry.
//!
//! Registry operations return [`ConfigError`]; the binary converts them to
//! [`anyhow::Error`] at the command boundary via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError
//! ├── EmptyKey / EmptyPath / UnknownType                  — precondition violations
//! ├── InvalidPattern / InvalidFilter                      — bad regular expressions
//! ├── Locked                                              — lock violation
//! ├── Validation(ValidationError)                         — type or pattern mismatch
//! ├── NoDefault / NotSet                                  — not found
//! └── FileNotFound / Io                                   — filesystem failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A key argument was empty.
    #[error("configuration key must not be empty")]
    EmptyKey,

    /// A path argument was empty.
    #[error("file path must not be empty")]
    EmptyPath,

    /// The type name passed to `register` is not one of the known types.
    #[error("unknown type '{0}': must be one of string, int, bool, path, list")]
    UnknownType(String),

    /// The validation pattern passed to `register` is not a valid regex.
    #[error("invalid validation pattern for '{key}': {source}")]
    InvalidPattern {
        /// Key being registered.
        key: String,
        /// Underlying regex compilation error.
        source: regex::Error,
    },

    /// A key filter passed to `list` is not a valid regex.
    #[error("invalid key filter: {0}")]
    InvalidFilter(regex::Error),

    /// The key is locked against modification.
    #[error("configuration key '{0}' is locked")]
    Locked(String),

    /// The value did not pass validation for the key.
    #[error("invalid value for '{key}': {reason}")]
    Validation {
        /// Key being set.
        key: String,
        /// Which check failed.
        reason: ValidationError,
    },

    /// `reset` was called on a key without a (non-empty) default.
    #[error("no default value for '{0}'")]
    NoDefault(String),

    /// `show` was called on a key without a current value.
    #[error("configuration key '{0}' is not set")]
    NotSet(String),

    /// A config file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An I/O error occurred while reading or writing a config file.
    #[error("IO error on config file {}: {source}", path.display())]
    Io {
        /// Path to the file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// The check that rejected a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value of an `int` key is not an optionally signed decimal integer.
    #[error("expected integer, got '{0}'")]
    NotInteger(String),

    /// Value of a `bool` key is not a recognised boolean word.
    #[error("expected boolean (true/false/yes/no/1/0/on/off), got '{0}'")]
    NotBoolean(String),

    /// Value does not match the key's validation pattern.
    #[error("'{value}' does not match pattern '{pattern}'")]
    PatternMismatch {
        /// Rejected value.
        value: String,
        /// Pattern it was checked against.
        pattern: String,
    },
}

impl ConfigError {
    /// Build an [`Io`](Self::Io) error for `path`.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn locked_display() {
        let e = ConfigError::Locked("log.level".to_string());
        assert_eq!(e.to_string(), "configuration key 'log.level' is locked");
    }

    #[test]
    fn unknown_type_display() {
        let e = ConfigError::UnknownType("float".to_string());
        assert_eq!(
            e.to_string(),
            "unknown type 'float': must be one of string, int, bool, path, list"
        );
    }

    #[test]
    fn validation_display_names_check() {
        let e = ConfigError::Validation {
            key: "net.timeout".to_string(),
            reason: ValidationError::NotInteger("abc".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "invalid value for 'net.timeout': expected integer, got 'abc'"
        );
    }

    #[test]
    fn pattern_mismatch_display() {
        let e = ValidationError::PatternMismatch {
            value: "loud".to_string(),
            pattern: "^(debug|info)$".to_string(),
        };
        assert_eq!(e.to_string(), "'loud' does not match pattern '^(debug|info)$'");
    }

    #[test]
    fn file_not_found_display() {
        let e = ConfigError::FileNotFound(PathBuf::from("/nope/config"));
        assert_eq!(e.to_string(), "config file not found: /nope/config");
    }

    #[test]
    fn io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::io(
            "/etc/config",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/etc/config"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<ValidationError>();
    }

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::EmptyKey;
        let _anyhow_err: anyhow::Error = e.into();
    }
}
