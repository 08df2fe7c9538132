//! Retirement IRR CLI
//!
//! Solve a single cash-flow shape or run a CSV sheet of retirement plans

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retirement_irr::report::describe_outcome;
use retirement_irr::sinks::{CsvResultsWriter, LogNotifier, Notifier, OutboxNotifier};
use retirement_irr::{plan, IrrSolver, PlanRunner, SolverConfig};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "retirement_irr", version, about = "Required annual return for retirement savings plans")]
struct Cli {
    /// JSON file overriding solver parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one shape: initial sum, yearly contribution, years, target
    Solve {
        #[arg(long, allow_negative_numbers = true)]
        initial: f64,
        #[arg(long, allow_negative_numbers = true)]
        contribution: f64,
        #[arg(long)]
        periods: u32,
        #[arg(long, allow_negative_numbers = true)]
        target: f64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every plan in a CSV sheet
    Batch {
        #[arg(long)]
        input: PathBuf,
        /// Results CSV (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// JSON-lines outbox for reports (logged if omitted)
        #[arg(long)]
        outbox: Option<PathBuf>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct SolveResponse {
    status: &'static str,
    required_return: String,
    rate: Option<f64>,
    iterations: Option<u32>,
}

#[derive(Serialize)]
struct BatchResponse {
    rows: usize,
    solved: usize,
    failed: usize,
    notified: usize,
    execution_time_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SolverConfig::from_json_path(path)
            .with_context(|| format!("Failed to read solver config {}", path.display()))?,
        None => SolverConfig::default(),
    };
    log::debug!("Solver config: {:?}", config);

    match cli.command {
        Command::Solve { initial, contribution, periods, target, json } => {
            let outcome = IrrSolver::new(config).solve_inputs(initial, contribution, periods, target);
            let text = describe_outcome(&outcome);

            if json {
                let response = SolveResponse {
                    status: match &outcome {
                        Ok(_) => "ok",
                        Err(err) => err.kind().as_str(),
                    },
                    required_return: text,
                    rate: outcome.as_ref().ok().map(|s| s.rate),
                    iterations: outcome.as_ref().ok().map(|s| s.iterations),
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                println!("{}", text);
            }
        }
        Command::Batch { input, output, outbox, json } => {
            let start = Instant::now();
            let plans = plan::load_plans(&input)
                .with_context(|| format!("Failed to load plans from {}", input.display()))?;
            log::info!("Loaded {} plans from {}", plans.len(), input.display());

            let runner = PlanRunner::new(config);
            let today = chrono::Local::now().date_naive();

            let mut notifier: Box<dyn Notifier> = match &outbox {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create outbox {}", path.display()))?;
                    Box::new(OutboxNotifier::new(BufWriter::new(file)))
                }
                None => Box::new(LogNotifier),
            };

            let summary = match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let mut results = CsvResultsWriter::new(BufWriter::new(file));
                    runner.run(&plans, &mut results, notifier.as_mut(), today)?
                }
                None => {
                    let mut results = CsvResultsWriter::new(io::stdout().lock());
                    runner.run(&plans, &mut results, notifier.as_mut(), today)?
                }
            };
            notifier.flush().context("Failed to flush notifications")?;

            if json {
                let response = BatchResponse {
                    rows: summary.rows,
                    solved: summary.solved,
                    failed: summary.failed,
                    notified: summary.notified,
                    execution_time_ms: start.elapsed().as_millis() as u64,
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                eprintln!(
                    "Processed {} plans ({} solved, {} failed, {} notified) in {:?}",
                    summary.rows, summary.solved, summary.failed, summary.notified, start.elapsed()
                );
            }
        }
    }

    Ok(())
}
