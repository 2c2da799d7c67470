//! Subcommand orchestration for the `util-config` binary.
pub mod edit;
pub mod query;

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::cli::{Command, GlobalOpts};
use crate::config::Registry;

/// Build the registry every subcommand operates on.
///
/// Registers the built-in keys and applies the environment and the first
/// default config file (unless `--no-init`), then loads `--config` on top.
///
/// # Errors
///
/// Returns an error if the built-in keys fail to register or the `--config`
/// file cannot be read.
pub fn build_registry(global: &GlobalOpts) -> Result<Registry> {
    let mut registry = if global.no_init {
        Registry::new()
    } else {
        Registry::with_defaults().context("initialising configuration")?
    };

    if let Some(path) = &global.config {
        let report = registry
            .load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        if report.failed + report.skipped > 0 {
            tracing::warn!(
                "{} line(s) of {} were not applied",
                report.failed + report.skipped,
                path.display()
            );
        }
    }

    tracing::debug!("{} configuration keys available", registry.count());
    Ok(registry)
}

/// Run `command` against `registry`, writing command output to `out`.
///
/// # Errors
///
/// Returns an error if the operation fails or output cannot be written.
pub fn run(command: &Command, registry: &mut Registry, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Get { key, default } => query::get(registry, key, default.as_deref(), out),
        Command::GetBool { key } => query::get_bool(registry, key, out),
        Command::GetInt { key, default } => query::get_int(registry, key, default, out),
        Command::Validate { key, value } => query::validate(registry, key, value, out),
        Command::List { pattern, json } => query::list(registry, pattern.as_deref(), *json, out),
        Command::Show { key, json } => query::show(registry, key, *json, out),
        Command::Count => query::count(registry, out),
        Command::Export { format } => query::export(registry, *format, out),
        Command::Set { key, value, save } => {
            edit::set(registry, key, value, save.as_deref())
        }
        Command::Reset { key, save } => edit::reset(registry, key, save.as_deref()),
        Command::Save { path } => edit::save(registry, path),
        Command::Version => {
            let version =
                option_env!("UTIL_CONFIG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            writeln!(out, "util-config {version}")?;
            Ok(())
        }
    }
}
