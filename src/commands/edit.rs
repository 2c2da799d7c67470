//! Subcommands that modify the registry and optionally persist it.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::config::Registry;

/// Set `key` to `value`, then save to `save` if given.
///
/// # Errors
///
/// Returns an error if the key is locked, the value is invalid, or saving fails.
pub fn set(registry: &mut Registry, key: &str, value: &str, save: Option<&Path>) -> Result<()> {
    registry.set(key, value)?;
    tracing::info!("{key} = {value}");
    persist(registry, save)
}

/// Reset `key` to its default, then save to `save` if given.
///
/// # Errors
///
/// Returns an error if the key is locked, has no default, or saving fails.
pub fn reset(registry: &mut Registry, key: &str, save: Option<&Path>) -> Result<()> {
    registry.reset(key)?;
    tracing::info!("{key} reset to {}", registry.get(key));
    persist(registry, save)
}

/// Write every key to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(registry: &Registry, path: &Path) -> Result<()> {
    registry
        .save_to_file(path)
        .with_context(|| format!("saving configuration to {}", path.display()))
}

fn persist(registry: &Registry, save_path: Option<&Path>) -> Result<()> {
    match save_path {
        Some(path) => save(registry, path),
        None => Ok(()),
    }
}
