mod cli;
mod error_fmt;
mod logging;
mod read;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::Result;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::read::{ReadOverrides, run_read, success_json};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(explicit: Option<&Path>) -> Result<scale_config::Config> {
    match explicit {
        Some(path) => scale_config::load_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                scale_config::load_file(default)
            } else {
                Ok(scale_config::Config::default())
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info");
    let _log_guard = logging::init_tracing(cli.json, level, &cfg.logging);

    match cli.cmd {
        Commands::Health => {
            if cli.json {
                println!("{}", serde_json::json!({ "message": "OK" }));
            } else {
                println!("OK");
            }
            Ok(())
        }
        Commands::ListPorts => {
            let ports = scale_serial::list_ports()?;
            if cli.json {
                let list: Vec<_> = ports
                    .iter()
                    .map(|p| serde_json::json!({ "name": p.name, "kind": p.kind }))
                    .collect();
                println!("{}", serde_json::Value::from(list));
            } else if ports.is_empty() {
                println!("No serial ports found.");
            } else {
                for p in ports {
                    println!("{}\t{}", p.name, p.kind);
                }
            }
            Ok(())
        }
        Commands::Read {
            port,
            baudrate,
            timeout,
            max_iterations,
            overall_timeout_ms,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "could not install Ctrl-C handler");
                }
            }

            let overrides = ReadOverrides {
                port,
                baudrate,
                timeout,
                max_iterations,
                overall_timeout_ms,
            };
            let w = run_read(&cfg, &overrides, shutdown)?;
            tracing::info!(weight = w.value, unit = %w.unit, "stable reading");
            if cli.json {
                println!("{}", success_json(&w));
            } else {
                println!("Final stable weight reading: {w}");
            }
            Ok(())
        }
    }
}
