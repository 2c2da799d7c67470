//! Logging settings derived from the `log.*` configuration keys.
use std::io::IsTerminal as _;
use std::path::PathBuf;

use tracing_subscriber::filter::LevelFilter;

use crate::config::env::{EnvSource, env_var_name};

/// Console and file logging options.
///
/// The subscriber has to exist before the registry is built, so these are
/// read straight from the `UTIL_CONFIG_LOG_*` variables using the same
/// naming rule as the registry's environment loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Minimum level printed to the console.
    pub level: LevelFilter,
    /// Whether console output is colourised.
    pub color: bool,
    /// File that receives every event at `DEBUG` and above.
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Resolve settings from `env`; `verbose` forces `DEBUG` console output.
    #[must_use]
    pub fn from_env(env: &impl EnvSource, verbose: bool) -> Self {
        let var = |key: &str| env.var(&env_var_name(key)).filter(|v| !v.is_empty());

        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            var("log.level").map_or(LevelFilter::INFO, |l| level_from_name(&l))
        };
        let color = match var("log.color").as_deref() {
            Some("always") => true,
            Some("never") => false,
            _ => std::io::stderr().is_terminal() && env.var("NO_COLOR").is_none(),
        };

        Self {
            level,
            color,
            file: var("log.file").map(PathBuf::from),
        }
    }
}

/// Map a `log.level` value to a level filter; unknown names mean `INFO`.
#[must_use]
pub fn level_from_name(name: &str) -> LevelFilter {
    match name.to_ascii_lowercase().as_str() {
        "debug" | "trace" => LevelFilter::DEBUG,
        "warn" | "warning" => LevelFilter::WARN,
        "error" | "fatal" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}
