// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! annograph - graph export and annotation passes over a model snapshot.
//!
//! Usage:
//!   annograph export <snapshot.json> [--out DIR] [--categories LIST] [--tolerance T]
//!   annograph annotate <snapshot.json> <predictions.csv> [--report FILE]
//!
//! Exit code 0 on success, 1 when a pass fails, 2 on bad usage.

use std::path::PathBuf;
use std::process::ExitCode;

use annograph_model::Category;

mod commands;
mod config;

use commands::{AnnotateArgs, ExportArgs};
use config::Config;

enum Command {
    Export(ExportArgs),
    Annotate(AnnotateArgs),
}

fn print_usage() {
    eprintln!(
        "Usage:
  annograph export <snapshot.json> [options]
  annograph annotate <snapshot.json> <predictions.csv> [options]

Export options:
  --out DIR            Output directory for nodes.csv and edges.csv
  --categories LIST    Comma-separated category names (default: all)
  --tolerance T        Adjacency tolerance in model units

Annotate options:
  --report FILE        Path of the JSON pass report

Environment:
  ANNOGRAPH_OUTPUT_DIR, ANNOGRAPH_REPORT_PATH, ANNOGRAPH_ADJACENCY_TOLERANCE,
  RUST_LOG"
    );
}

fn parse_categories(list: &str) -> Result<Vec<Category>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| Category::from_name(name).ok_or_else(|| format!("Unknown category: {}", name)))
        .collect()
}

fn parse_args(args: &[String], config: &Config) -> Result<Command, String> {
    let command = args.first().ok_or("Missing command")?;
    let mut positional = Vec::new();
    let mut out_dir = config.output_dir.clone();
    let mut report = config.report_path.clone();
    let mut tolerance = config.adjacency_tolerance;
    let mut categories = None;

    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .ok_or_else(|| format!("Missing value for {}", args[i]))
        };
        match args[i].as_str() {
            "--out" => {
                out_dir = PathBuf::from(value(i)?);
                i += 1;
            }
            "--report" => {
                report = PathBuf::from(value(i)?);
                i += 1;
            }
            "--tolerance" => {
                tolerance = value(i)?
                    .parse()
                    .ok()
                    .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                    .ok_or_else(|| format!("Invalid tolerance: {}", args[i + 1]))?;
                i += 1;
            }
            "--categories" => {
                categories = Some(parse_categories(value(i)?)?);
                i += 1;
            }
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    match (command.as_str(), positional.as_slice()) {
        ("export", [snapshot]) => Ok(Command::Export(ExportArgs {
            snapshot: snapshot.clone(),
            out_dir,
            categories,
            adjacency_tolerance: tolerance,
        })),
        ("annotate", [snapshot, predictions]) => Ok(Command::Annotate(AnnotateArgs {
            snapshot: snapshot.clone(),
            predictions: predictions.clone(),
            report,
        })),
        ("export", _) => Err("export takes exactly one snapshot path".into()),
        ("annotate", _) => Err("annotate takes a snapshot path and a predictions path".into()),
        (other, _) => Err(format!("Unknown command: {}", other)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,annograph=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return ExitCode::from(2);
    }

    let config = Config::from_env();
    let command = match parse_args(&args, &config) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Export(args) => commands::export(&args).map(|()| true),
        Command::Annotate(args) => commands::annotate(&args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
