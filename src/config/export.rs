//! Listing, inspection, and export of registry contents.
use std::fmt;
use std::fmt::Write as _;

use regex::Regex;
use serde::Serialize;

use super::env::env_var_name;
use super::registry::Registry;
use crate::error::ConfigError;

/// Values longer than this are truncated in [`render_list`].
const LIST_VALUE_WIDTH: usize = 20;

/// One row of [`Registry::list`] output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    /// Configuration key.
    pub key: String,
    /// Full current value.
    pub value: String,
    /// Provenance tag (`default`, `env`, `file:<path>`, `runtime`).
    pub source: String,
    /// Whether the key is locked.
    pub locked: bool,
}

/// Everything known about one key, as shown by [`Registry::show`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDetails {
    /// Configuration key.
    pub key: String,
    /// Current value.
    pub value: String,
    /// Registered default, if any.
    pub default: Option<String>,
    /// Type name, if registered.
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    /// Provenance tag.
    pub source: String,
    /// Whether the key is locked.
    pub locked: bool,
    /// Registered description, if any.
    pub description: Option<String>,
    /// Validation pattern, if any.
    pub pattern: Option<String>,
}

impl fmt::Display for KeyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "(none)".to_string());
        writeln!(f, "Key:         {}", self.key)?;
        writeln!(f, "Value:       {}", self.value)?;
        writeln!(f, "Default:     {}", or_none(&self.default))?;
        writeln!(f, "Type:        {}", or_none(&self.value_type))?;
        writeln!(f, "Source:      {}", self.source)?;
        writeln!(f, "Locked:      {}", self.locked)?;
        writeln!(f, "Description: {}", or_none(&self.description))?;
        write!(f, "Validation:  {}", or_none(&self.pattern))
    }
}

impl Registry {
    /// List non-internal keys in sorted order, optionally filtered by a
    /// regex searched against the key name.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regex.
    pub fn list(&self, pattern: Option<&str>) -> Result<Vec<ListRow>, ConfigError> {
        let filter = pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()
            .map_err(ConfigError::InvalidFilter)?;

        Ok(self
            .entries()
            .filter(|(key, _)| filter.as_ref().is_none_or(|re| re.is_match(key)))
            .map(|(key, value)| ListRow {
                key: key.to_string(),
                value: value.to_string(),
                source: self.source_tag(key),
                locked: self.is_locked(key),
            })
            .collect())
    }

    /// Describe `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotSet`] if the key has no current value.
    pub fn show(&self, key: &str) -> Result<KeyDetails, ConfigError> {
        let Some(value) = self.value(key) else {
            tracing::warn!("configuration key '{key}' is not set");
            return Err(ConfigError::NotSet(key.to_string()));
        };
        let meta = self.meta(key);

        Ok(KeyDetails {
            key: key.to_string(),
            value: value.to_string(),
            default: self.default_of(key).map(str::to_string),
            value_type: meta.map(|m| m.value_type.to_string()),
            source: self.source_tag(key),
            locked: self.is_locked(key),
            description: meta
                .map(|m| m.description.clone())
                .filter(|d| !d.is_empty()),
            pattern: meta.and_then(|m| m.pattern.as_ref().map(|p| p.as_str().to_string())),
        })
    }

    /// Render `export NAME=value` lines for every non-internal key.
    #[must_use]
    pub fn export_env(&self) -> Vec<String> {
        self.entries()
            .map(|(key, value)| format!("export {}={}", env_var_name(key), shell_quote(value)))
            .collect()
    }

    /// Render a flat JSON object of every non-internal key, sorted by key.
    ///
    /// Every value is emitted as a JSON string, whatever its registered type.
    #[must_use]
    pub fn export_json(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries()
            .map(|(key, value)| (key.to_string(), serde_json::Value::from(value)))
            .collect();
        format!("{:#}", serde_json::Value::Object(map))
    }

    fn source_tag(&self, key: &str) -> String {
        self.source(key)
            .map_or_else(|| "unknown".to_string(), ToString::to_string)
    }
}

/// Render list rows as an aligned table with long values truncated.
#[must_use]
pub fn render_list(rows: &[ListRow]) -> String {
    let key_width = rows
        .iter()
        .map(|r| r.key.len())
        .chain(std::iter::once("KEY".len()))
        .max()
        .unwrap_or_default();

    let source_width = rows
        .iter()
        .map(|r| r.source.chars().count())
        .chain(std::iter::once("SOURCE".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<key_width$}  {:<LIST_VALUE_WIDTH$}  {:<source_width$}  LOCKED\n",
        "KEY", "VALUE", "SOURCE"
    );
    for row in rows {
        let value = truncate(&row.value, LIST_VALUE_WIDTH);
        let locked = if row.locked { "yes" } else { "no" };
        let _ = writeln!(
            out,
            "{:<key_width$}  {value:<LIST_VALUE_WIDTH$}  {:<source_width$}  {locked}",
            row.key, row.source
        );
    }
    out
}

/// Truncate `value` to `width` characters, ending with `...` when shortened.
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Quote `value` for safe use in a POSIX shell assignment.
///
/// Values made only of unambiguous characters are left bare; anything else
/// is single-quoted with embedded `'` escaped as `'\''`.
///
/// # Examples
///
/// ```
/// use util_config::config::export::shell_quote;
///
/// assert_eq!(shell_quote("info"), "info");
/// assert_eq!(shell_quote("two words"), "'two words'");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// assert_eq!(shell_quote(""), "''");
/// ```
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c);
    if !value.is_empty() && value.chars().all(safe) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
