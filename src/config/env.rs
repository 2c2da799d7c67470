//! Environment variable mapping and lookup.
use std::collections::HashMap;

/// Namespace prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "UTIL_CONFIG_";

/// Variable naming an explicit config file to load before the default search path.
pub const FILE_OVERRIDE_VAR: &str = "UTIL_CONFIG_FILE";

/// Source of environment variables.
///
/// [`ProcessEnv`] reads the real process environment; tests substitute an
/// in-memory map so they never mutate global state.
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource {
    /// Return the value of `name`, or `None` if unset or not valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;
}

/// [`EnvSource`] backed by [`std::env::var`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Derive the environment variable name for `key`.
///
/// ASCII letters are upper-cased and every character other than an ASCII
/// letter or digit becomes `_`, so the result is always a valid shell name.
///
/// # Examples
///
/// ```
/// use util_config::config::env::env_var_name;
///
/// assert_eq!(env_var_name("log.level"), "UTIL_CONFIG_LOG_LEVEL");
/// assert_eq!(env_var_name("file.checksum_algo"), "UTIL_CONFIG_FILE_CHECKSUM_ALGO");
/// assert_eq!(env_var_name("my-key"), "UTIL_CONFIG_MY_KEY");
/// ```
#[must_use]
pub fn env_var_name(key: &str) -> String {
    let suffix: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{ENV_PREFIX}{suffix}")
}
