#![deny(warnings)]

//! Interactive terminal front end for the matatu fleet simulation.

mod menu;
mod render;

use anyhow::{bail, Context, Result};
use sim_runtime::{GameConfig, GameSession};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    money: Option<u64>,
    location: Option<String>,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let raw = it.next().context("--config needs a value")?;
                parsed.config = Some(PathBuf::from(raw));
            }
            "--money" => {
                let raw = it.next().context("--money needs a value")?;
                parsed.money = Some(
                    raw.parse()
                        .with_context(|| format!("invalid --money value: {raw}"))?,
                );
            }
            "--location" => {
                parsed.location = Some(it.next().context("--location needs a value")?);
            }
            "--json" => parsed.json = true,
            "--version" | "-V" => parsed.version = true,
            other => bail!("unrecognized argument: {other}"),
        }
    }
    Ok(parsed)
}

fn version_line() -> String {
    format!(
        "matatu-fleet {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("MATATU_GIT_SHA"),
        env!("MATATU_BUILD_PROFILE")
    )
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(money) = args.money {
        cfg.starting_money = money;
    }
    if let Some(location) = &args.location {
        cfg.starting_location = location.clone();
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    // Logging goes to stderr so it never interleaves with the menu.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!("{}", version_line());
        return Ok(());
    }
    info!(?args, "starting CLI");

    let cfg = load_config(&args)?;
    let session = GameSession::from_config(&cfg)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = menu::Shell::new(session, stdin.lock(), stdout.lock());
    shell.run()?;

    if args.json {
        let snap = shell.session().snapshot();
        drop(shell);
        println!("{}", serde_json::to_string_pretty(&snap)?);
    }
    Ok(())
}
