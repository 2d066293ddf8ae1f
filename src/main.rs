//! Colonist, an Ants contest bot.
//!
//! Reads judge commands from stdin and writes orders to stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`).
//!
//! Usage:
//!   colonist [OPTIONS]
//!
//! Options:
//!   --config FILE   Planner config as JSON (default: built-in values)
//!   --seed N        Random seed, 0 for the judge's seed (default: 0)

use std::env;
use std::io::{self, BufRead, BufWriter};
use std::process::ExitCode;

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use colonist::config::PlannerConfig;
use colonist::engine::Engine;
use colonist::protocol::{parse_line, ProtocolError};

struct Options {
    config_path: Option<String>,
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            return ExitCode::from(2);
        }
    };

    let config = match &options.config_path {
        Some(path) => match PlannerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path, "{}", e);
                return ExitCode::from(2);
            }
        },
        None => PlannerConfig::default(),
    };

    let mut engine = Engine::new(config).with_seed(options.seed);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_line(&line) {
            Ok(c) => c,
            Err(ProtocolError::Empty) => continue,
            Err(e) => {
                warn!("skipping line: {}", e);
                continue;
            }
        };

        if let Err(e) = engine.handle(cmd, &mut out) {
            error!("failed to write to judge: {}", e);
            return ExitCode::FAILURE;
        }
        if engine.is_finished() {
            break;
        }
    }
    ExitCode::SUCCESS
}

/// Parses command-line flags. `Ok(None)` means help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options {
        config_path: None,
        seed: 0,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                options.config_path = Some(args.next().ok_or("--config needs a file path")?);
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                options.seed = value
                    .parse()
                    .map_err(|_| format!("invalid --seed value: {}", value))?;
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(Some(options))
}

fn print_usage() {
    eprintln!("Usage: colonist [--config FILE] [--seed N]");
}
