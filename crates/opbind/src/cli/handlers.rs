use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::ArgMatches;
use opbind_core::{Params, RenderOptions};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::CatalogOperation;
use crate::config::Config;

pub fn dispatch(matches: &ArgMatches, config: &Config) -> Result<ExitCode> {
    match matches.subcommand() {
        Some(("list", _)) => handle_list(),
        Some(("render", sub_m)) => handle_render(sub_m, config),
        Some(("parse", sub_m)) => handle_parse(sub_m, config),
        _ => anyhow::bail!("Unknown command. Run 'opbind --help' for usage."),
    }
}

fn handle_list() -> Result<ExitCode> {
    let mut out = std::io::stdout().lock();
    for op in CatalogOperation::all() {
        writeln!(out, "{:<26} {}", op.to_string(), op.description())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_render(matches: &ArgMatches, config: &Config) -> Result<ExitCode> {
    let operation = operation(matches)?;
    let params = matches
        .get_many::<String>("param")
        .into_iter()
        .flatten()
        .map(String::as_str)
        .map(parse_param)
        .collect::<Result<Params>>()?;
    let options = matches
        .get_many::<String>("include")
        .map(|keys| RenderOptions::include(keys.cloned()));

    let outcome = operation.execute(params, options.as_ref())?;
    if !outcome.success {
        tracing::warn!(operation = %operation, errors = %outcome.errors, "validation failed");
    }
    write_json(&outcome.data, config.pretty)?;
    Ok(exit_code(outcome.success))
}

fn handle_parse(matches: &ArgMatches, config: &Config) -> Result<ExitCode> {
    let operation = operation(matches)?;
    if !operation.parses_input() {
        anyhow::bail!("Operation '{operation}' does not parse input; try a *-create-album operation");
    }
    let document = matches
        .get_one::<String>("document")
        .context("Album JSON document required")?;

    let params = Params::new().with("album", document.as_str());
    let outcome = operation
        .execute(params, Some(&RenderOptions::default()))
        .with_context(|| format!("Failed to parse album through '{operation}'"))?;
    write_json(&outcome, config.pretty)?;
    Ok(exit_code(outcome.success))
}

fn operation(matches: &ArgMatches) -> Result<CatalogOperation> {
    let name = matches
        .get_one::<String>("operation")
        .context("Operation name required")?;
    name.parse()
        .with_context(|| format!("Unknown operation '{name}'. Run 'opbind list' for names."))
}

/// Split `KEY=VALUE`; VALUE is JSON when it parses, a string otherwise.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Parameter '{raw}' must look like KEY=VALUE"))?;
    if key.is_empty() {
        anyhow::bail!("Parameter '{raw}' has an empty key");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}

const fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
