//! CLI entry point for event-interceptor
//!
//! Lints interceptor rule tables and dry-runs map events against a game
//! database so the resulting interceptions can be inspected.

use anyhow::{Context, bail};
use event_interceptor::infrastructure::{
    ConfigRepository, DatabaseRepository, FileConfigRepository, FileDatabaseRepository,
};
use event_interceptor::{EventId, Interceptor, LintLevel, MapId, Session, lint};
use std::process;
use std::sync::Arc;

const DEFAULT_MAX_TICKS: usize = 1000;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => run_check(&args[2..]).await,
        "run" => run_event(&args[2..]).await.map(|()| true),
        "--help" | "-h" => {
            print_usage();
            return;
        }
        command => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("event-interceptor - Automatic common events around map events");
    println!();
    println!("USAGE:");
    println!("    event-interceptor check <config.json> [database.json]");
    println!("    event-interceptor run <config.json> <database.json> <map-id> <event-id> [--ticks N]");
    println!();
    println!("COMMANDS:");
    println!("    check    Lint the interceptor rule table");
    println!("    run      Start an event and print the execution trace");
    println!("    --help, -h");
    println!();
    println!("Set RUST_LOG=debug to see interception decisions.");
}

/// Returns whether the rule table is free of errors
async fn run_check(args: &[String]) -> anyhow::Result<bool> {
    let Some(config_path) = args.first() else {
        bail!("Missing config file path");
    };
    let config = FileConfigRepository::new(config_path).load_config().await?;
    let database = match args.get(1) {
        Some(path) => Some(FileDatabaseRepository::new(path).load_database().await?),
        None => None,
    };

    let result = lint(&config, database.as_ref());
    for issue in &result.issues {
        let level = match issue.level {
            LintLevel::Error => "error",
            LintLevel::Warning => "warning",
            LintLevel::Info => "info",
        };
        println!("{}[{}]: {}", level, issue.category, issue.message);
    }
    println!(
        "{} rule(s): {} error(s), {} warning(s), {} info",
        config.interceptor_list.len(),
        result.error_count,
        result.warning_count,
        result.info_count
    );

    Ok(!result.has_errors())
}

async fn run_event(args: &[String]) -> anyhow::Result<()> {
    if args.len() < 4 {
        bail!("Expected <config.json> <database.json> <map-id> <event-id>");
    }
    let config = FileConfigRepository::new(&args[0]).load_config().await?;
    let database = FileDatabaseRepository::new(&args[1]).load_database().await?;
    let map_id: u32 = args[2]
        .parse()
        .with_context(|| format!("Invalid map id '{}'", args[2]))?;
    let event_id: u32 = args[3]
        .parse()
        .with_context(|| format!("Invalid event id '{}'", args[3]))?;
    let max_ticks = parse_ticks(&args[4..])?;

    let mut session = Session::new(
        Arc::new(database),
        Interceptor::new(config),
        MapId::new(map_id),
    )?;
    session.start_event(EventId::new(event_id))?;
    let ticks = session.run_until_idle(max_ticks);

    for entry in session.trace() {
        println!("{}", entry);
    }
    if session.is_busy() {
        println!("Stopped after {} tick(s) with the event still running", ticks);
    } else {
        println!("Finished in {} tick(s)", ticks);
    }
    Ok(())
}

fn parse_ticks(args: &[String]) -> anyhow::Result<usize> {
    match args {
        [] => Ok(DEFAULT_MAX_TICKS),
        [flag, value] if flag == "--ticks" => value
            .parse()
            .with_context(|| format!("Invalid tick count '{}'", value)),
        _ => bail!("Unexpected arguments: {}", args.join(" ")),
    }
}
