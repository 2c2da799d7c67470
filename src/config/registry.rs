//! The configuration registry: values, defaults, metadata, provenance and locks.
use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use super::env::{EnvSource, ProcessEnv, env_var_name};
use super::types::{KeyMeta, Source, ValueType};
use super::validation;
use crate::error::ConfigError;

/// Keys starting with this marker are internal bookkeeping and never
/// listed, counted, or exported.
pub const INTERNAL_PREFIX: char = '_';

/// Key recording that the default catalog has been registered.
pub const INITIALIZED_KEY: &str = "_initialized";

/// Return `true` if `key` is an internal bookkeeping key.
#[must_use]
pub fn is_internal(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX)
}

/// Outcome of a bulk load from the environment or a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries stored successfully.
    pub loaded: usize,
    /// Entries rejected by `set` (locked or invalid).
    pub failed: usize,
    /// Lines that could not be parsed.
    pub skipped: usize,
}

/// Key-indexed configuration store.
///
/// Each concern lives in its own map so that a key may hold a value without
/// being registered (runtime `set` of an unknown key) or be locked before it
/// has a value.
#[derive(Debug, Default)]
pub struct Registry {
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    meta: BTreeMap<String, KeyMeta>,
    sources: BTreeMap<String, Source>,
    locked: BTreeSet<String>,
}

impl Registry {
    /// Create an empty registry without the default catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` with its default, type, description and optional pattern.
    ///
    /// Default and metadata are overwritten on every call; the current value
    /// is only seeded from the default when the key has none. The default is
    /// not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is empty, `value_type` is not a known type
    /// name, or `pattern` is not a valid regular expression.
    pub fn register(
        &mut self,
        key: &str,
        default: &str,
        value_type: &str,
        description: &str,
        pattern: Option<&str>,
    ) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        let value_type: ValueType = value_type.parse()?;
        let pattern = pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()
            .map_err(|source| ConfigError::InvalidPattern {
                key: key.to_string(),
                source,
            })?;

        self.defaults.insert(key.to_string(), default.to_string());
        self.meta.insert(
            key.to_string(),
            KeyMeta {
                value_type,
                description: description.to_string(),
                pattern,
            },
        );

        if !self.values.contains_key(key) {
            self.values.insert(key.to_string(), default.to_string());
            self.sources.insert(key.to_string(), Source::Default);
        }

        tracing::debug!("registered {key} ({value_type}, default '{default}')");
        Ok(())
    }

    /// Set `key` to `value`, recording the change as a runtime update.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is empty, locked, or `value` fails validation.
    /// The registry is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_from(key, value, Source::Runtime)
    }

    /// Shared path for `set` and the loaders, which tag their own provenance.
    pub(crate) fn set_from(
        &mut self,
        key: &str,
        value: &str,
        source: Source,
    ) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.locked.contains(key) {
            tracing::warn!("cannot set '{key}': key is locked");
            return Err(ConfigError::Locked(key.to_string()));
        }
        if !self.meta.contains_key(key) {
            tracing::warn!("setting unregistered configuration key '{key}'");
        }
        if let Err(err) = self.validate(key, value) {
            tracing::warn!("{err}");
            return Err(err);
        }

        tracing::debug!("set {key}={value} ({source})");
        self.values.insert(key.to_string(), value.to_string());
        self.sources.insert(key.to_string(), source);
        Ok(())
    }

    /// Return the current value of `key`, or `""` if it has none.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.get_or(key, "")
    }

    /// Return the current value of `key`, or `default` if it has none.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map_or(default, String::as_str)
    }

    /// Return the current value of `key` if it has one.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Interpret `key` as a boolean: `true|yes|1|on` (any case) are true,
    /// everything else, including an absent key, is false.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        validation::is_truthy(self.get_or(key, "false"))
    }

    /// Return the value of `key` if it is an unsigned integer, otherwise
    /// `default` unchanged (the default itself is not checked).
    #[must_use]
    pub fn get_int<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        let value = self.get_or(key, default);
        if validation::is_unsigned_int(value) {
            value
        } else {
            default
        }
    }

    /// Check `value` against the type and pattern registered for `key`.
    ///
    /// Unregistered keys accept any value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the check that failed.
    pub fn validate(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(meta) = self.meta.get(key) else {
            return Ok(());
        };
        validation::validate(meta, value).map_err(|reason| ConfigError::Validation {
            key: key.to_string(),
            reason,
        })
    }

    /// Lock `key` against `set` and `reset`. The key need not exist.
    pub fn lock(&mut self, key: &str) {
        self.locked.insert(key.to_string());
    }

    /// Clear the lock on `key`; a no-op if it was not locked.
    pub fn unlock(&mut self, key: &str) {
        self.locked.remove(key);
    }

    /// Return `true` if `key` is locked.
    #[must_use]
    pub fn is_locked(&self, key: &str) -> bool {
        self.locked.contains(key)
    }

    /// Restore `key` to its registered default.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is locked or has no non-empty default.
    pub fn reset(&mut self, key: &str) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.locked.contains(key) {
            tracing::warn!("cannot reset '{key}': key is locked");
            return Err(ConfigError::Locked(key.to_string()));
        }
        let Some(default) = self.defaults.get(key).filter(|d| !d.is_empty()).cloned() else {
            tracing::warn!("no default value for '{key}'");
            return Err(ConfigError::NoDefault(key.to_string()));
        };

        tracing::debug!("reset {key} to '{default}'");
        self.values.insert(key.to_string(), default);
        self.sources.insert(key.to_string(), Source::Default);
        Ok(())
    }

    /// Return the provenance of the current value of `key`.
    #[must_use]
    pub fn source(&self, key: &str) -> Option<&Source> {
        self.sources.get(key)
    }

    /// Return the registered default of `key`.
    #[must_use]
    pub fn default_of(&self, key: &str) -> Option<&str> {
        self.defaults.get(key).map(String::as_str)
    }

    /// Return the metadata registered for `key`.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&KeyMeta> {
        self.meta.get(key)
    }

    /// Return `true` if `key` has been registered.
    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }

    /// Iterate over non-internal keys holding a value, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !is_internal(k))
    }

    /// Iterate over non-internal `(key, value)` pairs, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(k, _)| !is_internal(k))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of non-internal keys holding a value.
    #[must_use]
    pub fn count(&self) -> usize {
        self.keys().count()
    }

    /// Load every registered key from its `UTIL_CONFIG_*` process environment variable.
    pub fn load_from_environment(&mut self) -> LoadReport {
        self.load_from_env_source(&ProcessEnv)
    }

    /// Load every registered key from `env`.
    ///
    /// Unset and empty variables are ignored. Values that fail `set` are
    /// counted as failures; the load itself never fails.
    pub fn load_from_env_source(&mut self, env: &impl EnvSource) -> LoadReport {
        let mut report = LoadReport::default();
        let keys: Vec<String> = self.meta.keys().cloned().collect();

        for key in keys {
            let name = env_var_name(&key);
            let Some(value) = env.var(&name).filter(|v| !v.is_empty()) else {
                continue;
            };
            match self.set_from(&key, &value, Source::Env) {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    tracing::warn!("ignoring {name}: {err}");
                    report.failed += 1;
                }
            }
        }

        if report.loaded > 0 {
            tracing::debug!("loaded {} value(s) from environment", report.loaded);
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::env::MockEnvSource;
    use crate::error::ValidationError;
    use std::collections::HashMap;

    fn registry_with_timeout() -> Registry {
        let mut reg = Registry::new();
        reg.register("net.timeout", "30", "int", "Network timeout", Some("^[0-9]+$"))
            .unwrap();
        reg
    }

    #[test]
    fn register_seeds_value_from_default() {
        let reg = registry_with_timeout();
        assert_eq!(reg.get("net.timeout"), "30");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Default));
        assert_eq!(reg.default_of("net.timeout"), Some("30"));
        assert!(reg.is_registered("net.timeout"));
    }

    #[test]
    fn register_rejects_empty_key() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.register("", "x", "string", "", None),
            Err(ConfigError::EmptyKey)
        ));
    }

    #[test]
    fn register_rejects_unknown_type() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.register("a.b", "x", "float", "", None),
            Err(ConfigError::UnknownType(_))
        ));
        assert!(!reg.is_registered("a.b"));
    }

    #[test]
    fn register_rejects_invalid_pattern() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.register("a.b", "x", "string", "", Some("(unclosed")),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn register_does_not_validate_default() {
        let mut reg = Registry::new();
        reg.register("a.n", "not-a-number", "int", "", None).unwrap();
        assert_eq!(reg.get("a.n"), "not-a-number");
    }

    #[test]
    fn reregister_keeps_value_but_replaces_default() {
        let mut reg = registry_with_timeout();
        reg.set("net.timeout", "45").unwrap();
        reg.register("net.timeout", "60", "int", "Updated", None)
            .unwrap();
        assert_eq!(reg.get("net.timeout"), "45");
        assert_eq!(reg.default_of("net.timeout"), Some("60"));
        assert_eq!(reg.meta("net.timeout").unwrap().description, "Updated");
        assert!(reg.meta("net.timeout").unwrap().pattern.is_none());
    }

    #[test]
    fn set_marks_runtime_source() {
        let mut reg = registry_with_timeout();
        reg.set("net.timeout", "20").unwrap();
        assert_eq!(reg.get("net.timeout"), "20");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Runtime));
    }

    #[test]
    fn set_invalid_int_leaves_value_unchanged() {
        let mut reg = registry_with_timeout();
        reg.set("net.timeout", "20").unwrap();
        let err = reg.set("net.timeout", "abc").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                reason: ValidationError::NotInteger(_),
                ..
            }
        ));
        assert_eq!(reg.get("net.timeout"), "20");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Runtime));
    }

    #[test]
    fn set_rejects_empty_key() {
        let mut reg = Registry::new();
        assert!(matches!(reg.set("", "v"), Err(ConfigError::EmptyKey)));
    }

    #[test]
    fn set_unregistered_key_accepts_anything() {
        let mut reg = Registry::new();
        reg.set("custom.thing", "whatever").unwrap();
        assert_eq!(reg.get("custom.thing"), "whatever");
        assert!(!reg.is_registered("custom.thing"));
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn locked_key_rejects_set_and_reset() {
        let mut reg = registry_with_timeout();
        reg.set("net.timeout", "20").unwrap();
        reg.lock("net.timeout");

        assert!(matches!(
            reg.set("net.timeout", "25"),
            Err(ConfigError::Locked(_))
        ));
        assert!(matches!(reg.reset("net.timeout"), Err(ConfigError::Locked(_))));
        assert_eq!(reg.get("net.timeout"), "20");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Runtime));

        reg.unlock("net.timeout");
        reg.set("net.timeout", "25").unwrap();
        assert_eq!(reg.get("net.timeout"), "25");
    }

    #[test]
    fn lock_and_unlock_need_no_existing_key() {
        let mut reg = Registry::new();
        reg.unlock("never.locked");
        reg.lock("not.there");
        assert!(reg.is_locked("not.there"));
        assert!(matches!(reg.set("not.there", "x"), Err(ConfigError::Locked(_))));
    }

    #[test]
    fn reset_restores_default() {
        let mut reg = registry_with_timeout();
        reg.set("net.timeout", "99").unwrap();
        reg.reset("net.timeout").unwrap();
        assert_eq!(reg.get("net.timeout"), "30");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Default));
    }

    #[test]
    fn reset_without_default_fails() {
        let mut reg = Registry::new();
        reg.set("custom.thing", "x").unwrap();
        assert!(matches!(reg.reset("custom.thing"), Err(ConfigError::NoDefault(_))));

        reg.register("log.file", "", "path", "Log file", None).unwrap();
        assert!(matches!(reg.reset("log.file"), Err(ConfigError::NoDefault(_))));
    }

    #[test]
    fn get_falls_back_to_caller_default() {
        let reg = Registry::new();
        assert_eq!(reg.get("missing.key"), "");
        assert_eq!(reg.get_or("missing.key", "fallback"), "fallback");
        assert_eq!(reg.value("missing.key"), None);
    }

    #[test]
    fn get_bool_truth_table() {
        let mut reg = Registry::new();
        for (value, expected) in [
            ("true", true),
            ("YES", true),
            ("1", true),
            ("On", true),
            ("false", false),
            ("no", false),
            ("0", false),
            ("off", false),
            ("banana", false),
        ] {
            reg.set("flag.x", value).unwrap();
            assert_eq!(reg.get_bool("flag.x"), expected, "value '{value}'");
        }
        assert!(!reg.get_bool("flag.absent"));
    }

    #[test]
    fn get_int_returns_default_verbatim_on_non_numeric() {
        let mut reg = Registry::new();
        reg.set("n.ok", "42").unwrap();
        reg.set("n.neg", "-3").unwrap();
        reg.set("n.bad", "abc").unwrap();
        assert_eq!(reg.get_int("n.ok", "0"), "42");
        assert_eq!(reg.get_int("n.neg", "7"), "7");
        assert_eq!(reg.get_int("n.bad", "5"), "5");
        assert_eq!(reg.get_int("n.bad", ""), "");
        assert_eq!(reg.get_int("n.bad", "nope"), "nope");
        assert_eq!(reg.get_int("n.absent", "12"), "12");
    }

    #[test]
    fn validate_unregistered_always_passes() {
        let reg = Registry::new();
        assert!(reg.validate("who.knows", "anything").is_ok());
    }

    #[test]
    fn count_and_keys_exclude_internal() {
        let mut reg = registry_with_timeout();
        reg.register(INITIALIZED_KEY, "true", "bool", "", None).unwrap();
        reg.set("custom.a", "1").unwrap();
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["custom.a", "net.timeout"]);
        assert!(reg.entries().all(|(k, _)| !is_internal(k)));
    }

    #[test]
    fn end_to_end_register_set_reject() {
        let mut reg = Registry::new();
        reg.register("x.y", "10", "int", "desc", Some("^[0-9]+$"))
            .unwrap();
        assert_eq!(reg.get("x.y"), "10");
        reg.set("x.y", "20").unwrap();
        assert_eq!(reg.get("x.y"), "20");
        assert_eq!(reg.source("x.y").unwrap().to_string(), "runtime");
        assert!(reg.set("x.y", "abc").is_err());
        assert_eq!(reg.get("x.y"), "20");
    }

    #[test]
    fn env_load_sets_registered_keys() {
        let mut reg = registry_with_timeout();
        reg.register("log.level", "info", "string", "", None).unwrap();
        let mut env = HashMap::new();
        env.insert("UTIL_CONFIG_NET_TIMEOUT".to_string(), "15".to_string());
        env.insert("UTIL_CONFIG_LOG_LEVEL".to_string(), String::new());
        env.insert("UTIL_CONFIG_UNKNOWN_KEY".to_string(), "x".to_string());

        let report = reg.load_from_env_source(&env);
        assert_eq!(report.loaded, 1);
        assert_eq!(reg.get("net.timeout"), "15");
        assert_eq!(reg.source("net.timeout"), Some(&Source::Env));
        assert_eq!(reg.get("log.level"), "info");
        assert_eq!(reg.source("log.level"), Some(&Source::Default));
        assert_eq!(reg.value("unknown.key"), None);
    }

    #[test]
    fn env_load_counts_invalid_values_as_failures() {
        let mut reg = registry_with_timeout();
        let mut env = MockEnvSource::new();
        env.expect_var()
            .withf(|name| name == "UTIL_CONFIG_NET_TIMEOUT")
            .times(1)
            .return_const(Some("soon".to_string()));

        let report = reg.load_from_env_source(&env);
        assert_eq!(report, LoadReport { loaded: 0, failed: 1, skipped: 0 });
        assert_eq!(reg.get("net.timeout"), "30");
    }

    #[test]
    fn env_load_skips_locked_keys() {
        let mut reg = registry_with_timeout();
        reg.lock("net.timeout");
        let mut env = HashMap::new();
        env.insert("UTIL_CONFIG_NET_TIMEOUT".to_string(), "15".to_string());
        let report = reg.load_from_env_source(&env);
        assert_eq!(report.failed, 1);
        assert_eq!(reg.get("net.timeout"), "30");
    }
}
