use std::time::Instant;
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;
use fscachelib::config::SimulationConfig;
use fscachelib::io::load_trace;
use fscachelib::report::{format_stats, format_stats_table, Colour};
use fscachelib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Block cache simulator comparing ext3 and ext4 style access translation"))]
struct Args {
    /// JSON simulation configuration, the built-in defaults are used when omitted
    config: Option<String>,

    /// Replays a trace file instead of the generated access patterns
    #[arg(short, long)]
    trace: Option<String>,

    /// Overrides the seed of the random access pattern
    #[arg(short, long)]
    seed: Option<u64>,

    /// Prints the results as JSON instead of text
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,

    /// Logging verbosity, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    init_logging(args.verbose);
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_path(path).map_err(|e| format!("Couldn't load the config file at path {path}: {e}"))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let mut simulator = Simulator::new(&config).map_err(|e| e.to_string())?;
    let results = match &args.trace {
        Some(path) => {
            let accesses = load_trace(path).map_err(|e| format!("Couldn't load the trace file at path {path}: {e}"))?;
            tracing::info!(accesses = accesses.len(), "loaded trace");
            simulator.simulate("trace", &accesses)
        }
        None => simulator.simulate_patterns(),
    }.map_err(|e| format!("Simulation failed: {e}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        for result in &results {
            println!("{}", format_stats(result, Some(Colour::for_filesystem(&result.filesystem))));
        }
        println!("{}", format_stats_table(&results));
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes configuration and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let formatted = results
            .iter()
            .map(|r| format!("{}/{}/{}: {}", r.pattern, r.cache, r.filesystem, r.capacity - r.resident_blocks))
            .reduce(|a, b| format!("{a}, {b}"))
            .unwrap_or_default();
        println!("Unused cache slots by run: ({formatted})");
    }
    Ok(())
}
