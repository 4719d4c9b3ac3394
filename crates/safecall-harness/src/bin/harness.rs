//! CLI entrypoint for the safecall conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use safecall_harness::report::ConformanceReport;
use safecall_harness::structured_log::{LogEmitter, validate_log_file};
use safecall_harness::checks::run_suite;

/// Conformance tooling for safecall.
#[derive(Debug, Parser)]
#[command(name = "safecall-harness")]
#[command(about = "Conformance checking harness for safecall")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the conformance check suite.
    Run {
        /// Restrict to one domain (`pcre` or `network`).
        #[arg(long)]
        domain: Option<String>,
        /// Structured JSONL log output path (if omitted, logs are discarded).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Output report path, markdown (if omitted, prints JSON to stdout).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Run identifier used in trace IDs.
        #[arg(long, default_value = "local")]
        run_id: String,
    },
    /// Validate a structured JSONL log file against the schema.
    ValidateLog {
        /// Structured JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            domain,
            log,
            report,
            run_id,
        } => {
            let mut emitter = match &log {
                Some(path) => match LogEmitter::to_file(path, &run_id) {
                    Ok(e) => e,
                    Err(err) => {
                        eprintln!("cannot open log {}: {err}", path.display());
                        return ExitCode::FAILURE;
                    }
                },
                None => LogEmitter::to_buffer(&run_id),
            };
            let results = run_suite(domain.as_deref(), &mut emitter);
            let summary = ConformanceReport::from_results(results);
            match &report {
                Some(path) => {
                    if let Err(err) = std::fs::write(path, summary.to_markdown()) {
                        eprintln!("cannot write report {}: {err}", path.display());
                        return ExitCode::FAILURE;
                    }
                }
                None => match summary.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("cannot serialize report: {err}");
                        return ExitCode::FAILURE;
                    }
                },
            }
            if summary.is_clean() {
                ExitCode::SUCCESS
            } else {
                eprintln!("{} check(s) failed", summary.failed);
                ExitCode::FAILURE
            }
        }
        Command::ValidateLog { log } => match validate_log_file(&log) {
            Ok((lines, errors)) if errors.is_empty() => {
                println!("{lines} line(s) valid");
                ExitCode::SUCCESS
            }
            Ok((lines, errors)) => {
                eprintln!("{lines} line(s) checked, {} error(s):", errors.len());
                for e in &errors {
                    eprintln!("  {e}");
                }
                ExitCode::FAILURE
            }
            Err(err) => {
                eprintln!("cannot read {}: {err}", log.display());
                ExitCode::FAILURE
            }
        },
    }
}
