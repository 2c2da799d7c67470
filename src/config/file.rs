//! `key=value` config file parsing, search-path resolution, and saving.
use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::env::{EnvSource, FILE_OVERRIDE_VAR, ProcessEnv};
use super::registry::{LoadReport, Registry};
use super::types::Source;
use crate::error::ConfigError;

/// A classified line of a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank line or `#` comment.
    Ignored,
    /// A `key=value` assignment with one layer of quotes removed from the value.
    Entry {
        /// Configuration key.
        key: &'a str,
        /// Unquoted value.
        value: &'a str,
    },
    /// Anything else.
    Malformed,
}

/// Classify one line of a config file.
///
/// # Examples
///
/// ```
/// use util_config::config::file::{Line, parse_line};
///
/// assert_eq!(
///     parse_line("  net.timeout = \"45\""),
///     Line::Entry { key: "net.timeout", value: "45" }
/// );
/// assert_eq!(parse_line("# comment"), Line::Ignored);
/// assert_eq!(parse_line("Not A Key = 1"), Line::Malformed);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Ignored;
    }

    let Some((key, value)) = trimmed.split_once('=') else {
        return Line::Malformed;
    };
    let key = key.trim_end();
    if !is_valid_key(key) {
        return Line::Malformed;
    }

    Line::Entry {
        key,
        value: strip_quotes(value.trim_start()),
    }
}

/// Keys in files are restricted to `[a-z0-9_.]+`.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'.')
}

/// Remove one layer of matching surrounding `"` or `'` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Return `true` if `key=value` can be written as one line and read back unchanged.
fn is_saveable(key: &str, value: &str) -> bool {
    is_valid_key(key) && !value.contains(['\n', '\r'])
}

/// Return `true` if `value` must be quoted to survive a save/load round trip.
fn needs_quoting(value: &str) -> bool {
    value != value.trim() || strip_quotes(value) != value
}

/// Config file candidates in priority order.
///
/// `$UTIL_CONFIG_FILE` (when set and non-empty), then
/// `~/.config/bash_util/config`, then `~/.bash_util.conf`.
#[must_use]
pub fn search_paths(env: &impl EnvSource) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = env.var(FILE_OVERRIDE_VAR).filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    if let Some(home) = env
        .var("HOME")
        .or_else(|| env.var("USERPROFILE"))
        .filter(|h| !h.is_empty())
    {
        let home = PathBuf::from(home);
        paths.push(home.join(".config").join("bash_util").join("config"));
        paths.push(home.join(".bash_util.conf"));
    }
    paths
}

impl Registry {
    /// Load `key=value` lines from `path`.
    ///
    /// Malformed lines, lines that are not valid UTF-8, and rejected values
    /// are logged and skipped; one bad line never aborts the load.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is empty, does not exist, or cannot be read.
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadReport, ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if !path.exists() {
            tracing::warn!("config file not found: {}", path.display());
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|e| {
            tracing::warn!("cannot read config file {}: {e}", path.display());
            ConfigError::io(path, e)
        })?;

        let mut report = LoadReport::default();
        for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
            let line_num = idx + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let text = String::from_utf8_lossy(raw);
            let lossy = matches!(text, Cow::Owned(_));
            match parse_line(&text) {
                Line::Ignored => {}
                Line::Malformed | Line::Entry { .. } if lossy => {
                    tracing::warn!(
                        "{}:{line_num}: skipping line with invalid UTF-8",
                        path.display()
                    );
                    report.skipped += 1;
                }
                Line::Malformed => {
                    tracing::warn!(
                        "{}:{line_num}: skipping malformed line: {}",
                        path.display(),
                        text.trim()
                    );
                    report.skipped += 1;
                }
                Line::Entry { key, value } => {
                    match self.set_from(key, value, Source::File(path.to_path_buf())) {
                        Ok(()) => report.loaded += 1,
                        Err(err) => {
                            tracing::warn!("{}:{line_num}: {err}", path.display());
                            report.failed += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            "loaded {} value(s) from {}",
            report.loaded,
            path.display()
        );
        Ok(report)
    }

    /// Load the first readable file from the default search path.
    ///
    /// Returns the path that was loaded, or `None` if no candidate exists.
    pub fn load_from_files(&mut self) -> Option<PathBuf> {
        self.load_first_of(&search_paths(&ProcessEnv))
    }

    /// Load the first of `candidates` that loads successfully.
    ///
    /// Missing files are skipped silently; unreadable files are skipped
    /// with a warning. Finding nothing is not an error.
    pub fn load_first_of(&mut self, candidates: &[PathBuf]) -> Option<PathBuf> {
        for path in candidates {
            if !path.is_file() {
                tracing::debug!("no config file at {}", path.display());
                continue;
            }
            if self.load_from_file(path).is_ok() {
                return Some(path.clone());
            }
        }
        None
    }

    /// Write every non-internal key to `path`, sorted by key.
    ///
    /// Entries that could not be read back unchanged are skipped with a warning.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is empty, its parent cannot be created, or
    /// the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                tracing::warn!("cannot create directory {}: {e}", parent.display());
                ConfigError::io(parent, e)
            })?;
        }

        let (content, saved) = self.render_file();
        fs::write(path, content).map_err(|e| {
            tracing::warn!("cannot write config file {}: {e}", path.display());
            ConfigError::io(path, e)
        })?;

        tracing::info!("saved {saved} value(s) to {}", path.display());
        Ok(())
    }

    /// Render the saved-file representation of the registry and the number
    /// of entries written.
    ///
    /// Keys outside `[a-z0-9_.]+` and values spanning several lines cannot be
    /// read back, so they are left out with a warning.
    fn render_file(&self) -> (String, usize) {
        let mut out = format!(
            "# util-config configuration\n\
             # Generated {}\n\
             #\n\
             # Format: key=value (values may be wrapped in \"double\" or 'single' quotes)\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        );

        let mut saved = 0;
        for (key, value) in self.entries() {
            if !is_saveable(key, value) {
                tracing::warn!("not saving '{key}': key or value cannot be stored as one line");
                continue;
            }
            if let Some(meta) = self.meta(key) {
                for line in meta.description.lines().filter(|l| !l.trim().is_empty()) {
                    let _ = writeln!(out, "# {line}");
                }
            }
            if let Some(source) = self.source(key) {
                let _ = writeln!(out, "# source: {source}");
            }
            if needs_quoting(value) {
                let _ = writeln!(out, "{key}=\"{value}\"\n");
            } else {
                let _ = writeln!(out, "{key}={value}\n");
            }
            saved += 1;
        }
        (out, saved)
    }
}
