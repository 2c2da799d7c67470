//! Command-line definition for the `util-config` binary.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the configuration registry.
#[derive(Parser, Debug)]
#[command(
    name = "util-config",
    about = "Inspect and edit shell helper configuration",
    version
)]
pub struct Cli {
    /// The operation to perform.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Start from an empty registry instead of the built-in keys, environment and default files
    #[arg(long = "no-init", global = true)]
    pub no_init: bool,

    /// Additional config file loaded after initialisation
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value of a key
    Get {
        /// Configuration key
        key: String,
        /// Value printed when the key is not set
        #[arg(short, long)]
        default: Option<String>,
    },
    /// Print `true` or `false` for a boolean key
    GetBool {
        /// Configuration key
        key: String,
    },
    /// Print a key's value if it is an unsigned integer, otherwise the default
    GetInt {
        /// Configuration key
        key: String,
        /// Value printed when the key is not an unsigned integer
        #[arg(short, long, default_value = "")]
        default: String,
    },
    /// Set a key, optionally saving the result
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
        /// Save the registry to this file afterwards
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Restore a key to its default, optionally saving the result
    Reset {
        /// Configuration key
        key: String,
        /// Save the registry to this file afterwards
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Check a value against a key's type and pattern without storing it
    Validate {
        /// Configuration key
        key: String,
        /// Candidate value
        value: String,
    },
    /// List keys, optionally filtered by a regex on the key name
    List {
        /// Regular expression matched against key names
        pattern: Option<String>,
        /// Emit rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show everything known about a key
    Show {
        /// Configuration key
        key: String,
        /// Emit details as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the number of configured keys
    Count,
    /// Export all keys
    Export {
        /// Output format
        #[arg(value_enum, default_value_t = ExportFormat::Env)]
        format: ExportFormat,
    },
    /// Write all keys to a config file
    Save {
        /// Destination file
        path: PathBuf,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Short name used to label log output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::GetBool { .. } => "get-bool",
            Self::GetInt { .. } => "get-int",
            Self::Set { .. } => "set",
            Self::Reset { .. } => "reset",
            Self::Validate { .. } => "validate",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Count => "count",
            Self::Export { .. } => "export",
            Self::Save { .. } => "save",
            Self::Version => "version",
        }
    }
}

/// Export output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `export NAME=value` lines
    Env,
    /// Flat JSON object
    Json,
}
