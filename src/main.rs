//! `util-config` binary entry point.

use anyhow::Result;
use clap::Parser;

use util_config::config::env::ProcessEnv;
use util_config::logging::{self, LogSettings};
use util_config::{cli, commands};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let settings = LogSettings::from_env(&ProcessEnv, args.verbose);
    logging::init_subscriber(&settings, args.command.name());

    let mut registry = commands::build_registry(&args.global)?;
    let stdout = std::io::stdout();
    commands::run(&args.command, &mut registry, &mut stdout.lock())
}
