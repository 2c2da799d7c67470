#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for subcommand dispatch.
//!
//! Commands run against a registry built with `--no-init` semantics plus a
//! `--config` file, so results do not depend on the host environment.

mod common;

use clap::Parser;

use util_config::cli::Cli;
use util_config::commands;

fn run(ctx: &common::IntegrationTestContext, args: &[&str]) -> anyhow::Result<String> {
    let config = ctx.path("config");
    let config = config.to_str().unwrap();
    let mut argv = vec!["util-config", "--no-init", "--config", config];
    argv.extend_from_slice(args);
    let cli = Cli::parse_from(argv);

    let mut registry = commands::build_registry(&cli.global)?;
    let mut out = Vec::new();
    commands::run(&cli.command, &mut registry, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn context() -> common::IntegrationTestContext {
    common::TestContextBuilder::new()
        .with_config_file(
            "config",
            "net.timeout=45\ntmp.cleanup=on\nnet.user_agent=\"my agent\"\n",
        )
        .build()
}

#[test]
fn get_reads_config_file() {
    let ctx = context();
    assert_eq!(run(&ctx, &["get", "net.timeout"]).unwrap(), "45\n");
    assert_eq!(run(&ctx, &["get", "missing.key", "-d", "x"]).unwrap(), "x\n");
}

#[test]
fn typed_getters() {
    let ctx = context();
    assert_eq!(run(&ctx, &["get-bool", "tmp.cleanup"]).unwrap(), "true\n");
    assert_eq!(
        run(&ctx, &["get-int", "net.user_agent", "--default", "0"]).unwrap(),
        "0\n"
    );
}

#[test]
fn export_env_quotes_values() {
    let ctx = context();
    let out = run(&ctx, &["export", "env"]).unwrap();
    assert!(out.contains("export UTIL_CONFIG_NET_USER_AGENT='my agent'\n"));
    assert!(out.contains("export UTIL_CONFIG_NET_TIMEOUT=45\n"));
}

#[test]
fn export_json_is_flat_strings() {
    let ctx = context();
    let out = run(&ctx, &["export", "json"]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["net.timeout"], "45");
    assert_eq!(json["tmp.cleanup"], "on");
}

#[test]
fn set_with_save_persists() {
    let ctx = context();
    let saved = ctx.path("out/config");
    run(
        &ctx,
        &["set", "net.timeout", "50", "--save", saved.to_str().unwrap()],
    )
    .unwrap();
    let content = std::fs::read_to_string(saved).unwrap();
    assert!(content.contains("net.timeout=50\n"));
    assert!(content.contains("net.user_agent=my agent\n"));
}

#[test]
fn show_unknown_key_fails() {
    let ctx = context();
    let err = run(&ctx, &["show", "nope.key"]).unwrap_err();
    assert!(err.to_string().contains("not set"));
}

#[test]
fn list_table_has_header_and_rows() {
    let ctx = context();
    let out = run(&ctx, &["list", "^net"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("KEY"));
    assert!(lines[1].starts_with("net.timeout"));
    assert!(lines[2].starts_with("net.user_agent"));
}

#[test]
fn count_and_version() {
    let ctx = context();
    assert_eq!(run(&ctx, &["count"]).unwrap(), "3\n");
    assert!(run(&ctx, &["version"]).unwrap().starts_with("util-config "));
}

#[test]
fn missing_config_file_is_an_error() {
    let ctx = common::IntegrationTestContext::new();
    let err = run(&ctx, &["count"]).unwrap_err();
    assert!(format!("{err:#}").contains("config file not found"));
}
