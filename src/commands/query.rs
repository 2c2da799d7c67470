//! Read-only subcommands.
use std::io::Write;

use anyhow::Result;

use crate::cli::ExportFormat;
use crate::config::Registry;
use crate::config::export::render_list;

/// Print the value of `key`, or `default`, or an empty line.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn get(
    registry: &Registry,
    key: &str,
    default: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", registry.get_or(key, default.unwrap_or_default()))?;
    Ok(())
}

/// Print `true` or `false`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn get_bool(registry: &Registry, key: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", registry.get_bool(key))?;
    Ok(())
}

/// Print the integer value of `key`, or `default`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn get_int(registry: &Registry, key: &str, default: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", registry.get_int(key, default))?;
    Ok(())
}

/// Check `value` for `key` without storing it.
///
/// # Errors
///
/// Returns an error if the value is invalid or output cannot be written.
pub fn validate(registry: &Registry, key: &str, value: &str, out: &mut impl Write) -> Result<()> {
    registry.validate(key, value)?;
    writeln!(out, "valid")?;
    Ok(())
}

/// Print the key table, or its JSON form.
///
/// # Errors
///
/// Returns an error if the filter is not a valid regex or output cannot be written.
pub fn list(
    registry: &Registry,
    pattern: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let rows = registry.list(pattern)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_list(&rows))?;
    }
    Ok(())
}

/// Print details of `key`.
///
/// # Errors
///
/// Returns an error if the key is not set or output cannot be written.
pub fn show(registry: &Registry, key: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let details = registry.show(key)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &details)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{details}")?;
    }
    Ok(())
}

/// Print the number of keys.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn count(registry: &Registry, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", registry.count())?;
    Ok(())
}

/// Print every key as `export` lines or a JSON object.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn export(registry: &Registry, format: ExportFormat, out: &mut impl Write) -> Result<()> {
    match format {
        ExportFormat::Env => {
            for line in registry.export_env() {
                writeln!(out, "{line}")?;
            }
        }
        ExportFormat::Json => writeln!(out, "{}", registry.export_json())?,
    }
    Ok(())
}
