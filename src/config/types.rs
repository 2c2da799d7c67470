//! Core registry types: value types, provenance tags, and per-key metadata.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use regex::Regex;

use crate::error::ConfigError;

/// Logical type of a configuration value.
///
/// Values are always stored as strings; the type only decides which
/// intrinsic check [`validate`](super::validation::validate) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Free-form text.
    String,
    /// Optionally signed decimal integer.
    Int,
    /// One of `true|false|yes|no|1|0|on|off`.
    Bool,
    /// Filesystem path; existence is not checked.
    Path,
    /// Free-form list (separator is up to the caller).
    List,
}

impl ValueType {
    /// All recognised type names, in declaration order.
    pub const NAMES: &[&str] = &["string", "int", "bool", "path", "list"];

    /// Return the lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Path => "path",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "bool" => Ok(Self::Bool),
            "path" => Ok(Self::Path),
            "list" => Ok(Self::List),
            other => Err(ConfigError::UnknownType(other.to_string())),
        }
    }
}

/// Where the current value of a key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Seeded by `register` or restored by `reset`.
    Default,
    /// Loaded from a `UTIL_CONFIG_*` environment variable.
    Env,
    /// Loaded from the given config file.
    File(PathBuf),
    /// Set programmatically.
    Runtime,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Env => f.write_str("env"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Runtime => f.write_str("runtime"),
        }
    }
}

/// Metadata fixed at registration time.
#[derive(Debug, Clone)]
pub struct KeyMeta {
    /// Logical type.
    pub value_type: ValueType,
    /// Human-readable description.
    pub description: String,
    /// Optional extra pattern the value must match.
    pub pattern: Option<Regex>,
}
