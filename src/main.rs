//! Pramana CLI - Composable Validation Pipelines
//!
//! A demonstration CLI that runs the built-in named schemas over JSON input.

use anyhow::{bail, Context, Result};
use pramana::prelude::*;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pramana");

    if args.len() < 2 {
        print_usage(program);
        return;
    }

    let outcome = match args[1].as_str() {
        "list" => {
            list_schemas();
            Ok(true)
        }
        "check" => check_input(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(true)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            Ok(false)
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(2);
        }
    }
}

fn print_usage(program: &str) {
    println!("🔎 Pramana - Composable Validation Pipelines v{}", pramana::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                      List the built-in schemas");
    println!("  check <schema> <json>     Validate JSON input against a schema");
    println!("  help                      Show this help message");
    println!();
    println!("Check options:");
    println!("  --abort-early             Stop the whole run at the first issue");
    println!("  --abort-pipe-early        Stop the current pipe at the first issue");
    println!("  --lang <tag>              Language used for message lookup");
    println!("  --config <file>           TOML file with global defaults");
    println!();
    println!("Set RUST_LOG=debug to trace execution.");
}

fn list_schemas() {
    let registry = SchemaRegistry::with_builtins();

    println!("Available schemas ({} total):", registry.len());
    println!();
    for (name, entry) in registry.entries() {
        println!("  • {} - {}", name, entry.description);
        if !entry.tags.is_empty() {
            println!("      tags: {}", entry.tags.join(", "));
        }
    }
}

/// Options accepted by `check`.
#[derive(Debug, Default)]
struct CheckOptions {
    schema: String,
    input: String,
    abort: Option<AbortPolicy>,
    lang: Option<String>,
    config: Option<PathBuf>,
}

fn parse_check_args(args: &[String]) -> Result<CheckOptions> {
    let mut options = CheckOptions::default();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--abort-early" => {
                options.abort = Some(AbortPolicy::Early);
                i += 1;
            }
            "--abort-pipe-early" => {
                options.abort = Some(AbortPolicy::PipeEarly);
                i += 1;
            }
            "--lang" if i + 1 < args.len() => {
                options.lang = Some(args[i + 1].clone());
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                options.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            flag if flag.starts_with("--") => bail!("unknown or incomplete option '{}'", flag),
            value => {
                positional.push(value.to_string());
                i += 1;
            }
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([schema, input]) => {
            options.schema = schema;
            options.input = input;
            Ok(options)
        }
        Err(_) => bail!("expected exactly <schema> and <json>"),
    }
}

fn build_config(options: &CheckOptions) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => GlobalConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?
            .to_config(),
        None => global_config(),
    };
    if let Some(lang) = &options.lang {
        pramana::core::config::validate_lang(lang)?;
        config = config.with_lang(lang.clone());
    }
    if let Some(abort) = options.abort {
        config = config.with_abort(abort);
    }
    Ok(config)
}

fn check_input(args: &[String]) -> Result<bool> {
    let options = parse_check_args(args)?;
    let registry = SchemaRegistry::with_builtins();
    let Some(schema) = registry.create(&options.schema) else {
        bail!("schema '{}' not found; use 'list' to see available schemas", options.schema);
    };

    let config = build_config(&options)?;
    let result = execute_json(&schema, &options.input, Some(config)).context("input is not valid JSON")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    let report = result.report();
    println!();
    println!("{}", report.summary());
    for line in report.detailed() {
        println!("  {}", line);
    }
    Ok(result.success)
}
