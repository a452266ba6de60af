//! Bank Simulator CLI
//!
//! Runs one service-floor simulation and prints the end-of-run report.
//!
//! # Example
//!
//! ```bash
//! # 3 tellers, 5 queue slots, 40% arrival chance, fixed seed
//! bank-sim --horizon 200 --tellers 3 --queue-limit 5 --arrival-chance 40 --seed 7
//!
//! # Replay arrivals from a data file and print every tick
//! bank-sim --config run.json --replay arrivals.txt --trace
//! ```

use bank_simulator_core_rs::orchestrator::{build_arrival_source, ArrivalOutcome, BoxedArrivalSource};
use bank_simulator_core_rs::{
    ArrivalError, ArrivalSource, ArrivalSourceConfig, ConfigError, RunReport, SimulationConfig, SimulationEngine,
    SimulationError, TellerReport,
};
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RULE: &str = "---------------------------------------------------------------";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Arrival(#[from] ArrivalError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Bank service-floor simulator
///
/// Customers arrive each tick with a fixed chance, wait in a bounded queue,
/// and are served by a pool of tellers. Flags override values loaded with
/// `--config`.
#[derive(Parser, Debug)]
#[command(name = "bank-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate (max 10000)
    #[arg(short = 't', long)]
    horizon: Option<usize>,

    /// Maximum customer transaction time (max 500)
    #[arg(short = 'm', long)]
    max_transaction_time: Option<usize>,

    /// Chance in percent (1-100) that a customer arrives on a tick
    #[arg(short = 'a', long)]
    arrival_chance: Option<u32>,

    /// Number of tellers (max 10)
    #[arg(short = 'n', long)]
    tellers: Option<usize>,

    /// Customer queue limit (max 50)
    #[arg(short = 'q', long)]
    queue_limit: Option<usize>,

    /// Id of the first teller
    #[arg(long)]
    starting_teller_id: Option<usize>,

    /// Random seed. When omitted, one is derived from the clock.
    #[arg(long)]
    seed: Option<u64>,

    /// Replay arrivals from a file of whitespace-separated integer pairs
    #[arg(short = 'r', long, conflicts_with = "seed")]
    replay: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print what happens on every tick
    #[arg(long)]
    trace: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let mut config = build_config(args)?;
    config.validate()?;

    let source = arrival_source_with_fallback(&mut config)?;
    info!(
        horizon = config.simulation_horizon,
        tellers = config.teller_count,
        queue_limit = config.customer_queue_limit,
        source = source.name(),
        "starting simulation"
    );

    let mut engine = SimulationEngine::new(&config, source);
    let mut output = String::new();

    if args.trace {
        output.push_str("\n\t*** Start Simulation ***\n\n");
        while !engine.is_finished() {
            let result = engine.tick()?;
            write_tick(&mut output, &engine, result.tick, result.queue_len_at_start, result.arrival);
        }
    }

    let outcome = engine.run()?;
    let report = RunReport::from_outcome(&outcome)?;

    if args.json {
        output.push_str(&report.to_json()?);
        output.push('\n');
    } else {
        output.push_str(&render_report(&report));
    }
    Ok(output)
}

/// Merge the config file (or defaults) with explicit flags
fn build_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig {
            arrival_source: ArrivalSourceConfig::Random { seed: clock_seed() },
            ..SimulationConfig::default()
        },
    };

    if let Some(horizon) = args.horizon {
        config.simulation_horizon = horizon;
    }
    if let Some(max) = args.max_transaction_time {
        config.max_transaction_time = max;
    }
    if let Some(chance) = args.arrival_chance {
        config.arrival_probability_percent = chance;
    }
    if let Some(tellers) = args.tellers {
        config.teller_count = tellers;
    }
    if let Some(limit) = args.queue_limit {
        config.customer_queue_limit = limit;
    }
    if let Some(id) = args.starting_teller_id {
        config.starting_teller_id = id;
    }
    if let Some(seed) = args.seed {
        config.arrival_source = ArrivalSourceConfig::Random { seed };
    }
    if let Some(path) = &args.replay {
        config.arrival_source = ArrivalSourceConfig::Replay { path: path.clone() };
    }

    Ok(config)
}

/// Build the configured source; an unreadable replay file falls back to
/// random arrivals, and `config` is updated to say so
fn arrival_source_with_fallback(config: &mut SimulationConfig) -> Result<BoxedArrivalSource, CliError> {
    match build_arrival_source(config) {
        Err(ArrivalError::Io(reason)) => {
            let seed = clock_seed();
            warn!(%reason, seed, "replay file unavailable, using random arrivals");
            config.arrival_source = ArrivalSourceConfig::Random { seed };
            Ok(build_arrival_source(config)?)
        }
        other => Ok(other?),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn write_tick(
    out: &mut String,
    engine: &SimulationEngine,
    tick: usize,
    queue_len_at_start: usize,
    arrival: ArrivalOutcome,
) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Time  : {}", tick + 1);
    let _ = writeln!(
        out,
        "Queue : {}/{}",
        queue_len_at_start,
        engine.config().customer_queue_limit
    );

    if arrival == ArrivalOutcome::NoArrival {
        let _ = writeln!(out, "\tNo new customer!");
    }
    for event in engine.event_log().events_at_tick(tick) {
        let _ = writeln!(out, "\t{}", event);
    }
}

fn write_teller(out: &mut String, teller: &TellerReport) {
    let _ = writeln!(out, "\t\tTeller ID                : {}", teller.teller_id);
    let _ = writeln!(out, "\t\tTotal free time          : {}", teller.total_free_time);
    let _ = writeln!(out, "\t\tTotal busy time          : {}", teller.total_busy_time);
    let _ = writeln!(out, "\t\tTotal # of customers     : {}", teller.total_served);
    if let Some(average) = teller.average_transaction_time {
        let _ = writeln!(out, "\t\tAverage transaction time : {:.2}", average);
    }
    out.push('\n');
}

/// Text layout of the end-of-run report
fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n===============================================================\n");
    let _ = writeln!(out, "\t*** End of simulation report ***\n\n");
    let _ = writeln!(out, "\t\t# total arrival customers : {}", report.total_arrivals);
    let _ = writeln!(out, "\t\t# customers gone away     : {}", report.customers_balked);
    let _ = writeln!(out, "\t\t# customers served        : {}", report.customers_served);

    let _ = writeln!(out, "\n\n\t*** Current Tellers info. ***\n\n");
    let _ = writeln!(out, "\t\t# waiting customers : {}", report.summary.waiting_customers);
    let _ = writeln!(out, "\t\t# busy tellers      : {}", report.summary.busy_tellers);
    let _ = writeln!(out, "\t\t# free tellers      : {}", report.summary.free_tellers);

    let _ = writeln!(out, "\n\n\t\tTotal waiting time   : {}", report.cumulative_wait_ticks);
    let _ = writeln!(out, "\t\tAverage waiting time : {:.2}", report.average_waiting_time);

    let _ = writeln!(out, "\n\n\t*** Busy Tellers info. ***\n\n");
    if report.busy_tellers.is_empty() {
        let _ = writeln!(out, "\t\tNo busy tellers.\n");
    }
    for teller in &report.busy_tellers {
        write_teller(&mut out, teller);
    }

    let _ = writeln!(out, "\n\t*** Free Tellers Info. ***\n\n");
    if report.free_tellers.is_empty() {
        let _ = writeln!(out, "\t\tNo free tellers.\n");
    }
    for teller in &report.free_tellers {
        write_teller(&mut out, teller);
    }

    let _ = writeln!(out, "\t\tRun id      : {}", report.run_id);
    let _ = writeln!(out, "\t\tFingerprint : {}", report.config_fingerprint);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bank-sim").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&["--horizon", "50", "--tellers", "2", "--seed", "9"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.simulation_horizon, 50);
        assert_eq!(config.teller_count, 2);
        assert_eq!(config.customer_queue_limit, 5);
        assert_eq!(config.arrival_source, ArrivalSourceConfig::Random { seed: 9 });
    }

    #[test]
    fn test_replay_conflicts_with_seed() {
        let result = Args::try_parse_from(["bank-sim", "--seed", "1", "--replay", "data.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_replay_falls_back_to_random() {
        let mut config = SimulationConfig {
            arrival_source: ArrivalSourceConfig::Replay {
                path: PathBuf::from("/no/such/arrivals.txt"),
            },
            ..SimulationConfig::default()
        };

        let source = arrival_source_with_fallback(&mut config).unwrap();
        assert_eq!(source.name(), "random");
        assert!(matches!(config.arrival_source, ArrivalSourceConfig::Random { .. }));
    }

    #[test]
    fn test_out_of_range_flag_rejected() {
        let args = parse(&["--tellers", "11", "--seed", "1"]);
        assert!(matches!(run(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_text_report_layout() {
        let args = parse(&["--horizon", "20", "--tellers", "2", "--seed", "3"]);
        let output = run(&args).unwrap();

        assert!(output.contains("*** End of simulation report ***"));
        assert!(output.contains("# customers served"));
        assert!(output.contains("Average waiting time : "));
        assert!(output.contains("Free Tellers Info."));
    }

    #[test]
    fn test_trace_prints_every_tick() {
        let args = parse(&["--horizon", "4", "--seed", "5", "--trace"]);
        let output = run(&args).unwrap();

        assert_eq!(output.matches("Time  : ").count(), 4);
        assert!(output.contains("Time  : 4"));
    }

    #[test]
    fn test_json_report_parses() {
        let args = parse(&["--horizon", "10", "--seed", "2", "--json"]);
        let output = run(&args).unwrap();

        let report: RunReport = serde_json::from_str(&output).unwrap();
        assert_eq!(report.simulation_horizon, 10);
        assert_eq!(report.arrival_source, "random");
    }
}
