//! Pipeline loop model CLI.
//!
//! This binary provides a single entry point for driving the model. It
//! performs:
//! 1. **Run:** Advance the model a fixed number of cycles, optionally paced
//!    by a wall-clock period, rendering each cycle to the terminal or as
//!    JSON lines.
//! 2. **Topology:** Print the stage connection list without simulating.

use std::io::Write;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use loopsim_core::config::Config;
use loopsim_core::core::pipeline::Pipeline;
use loopsim_core::render::{JsonRenderer, NullRenderer, Renderer, TtyRenderer};
use loopsim_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "loopsim",
    author,
    version,
    about = "Cycle-accurate pipeline loop model",
    long_about = "Drive a model of a looping execution pipeline: reservation stations feed a \
setup stage, a loop of compute stages, and a finish stage, with randomized \
instruction cancellation.\n\nExamples:\n  loopsim run --cycles 32\n  loopsim run --cycles 100 --seed 7 --renderer json\n  loopsim run --period-ms 1500\n  loopsim topology"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Renderer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererKind {
    /// ANSI-colored terminal table.
    Tty,
    /// One JSON document per cycle on stdout.
    Json,
    /// No per-cycle output.
    None,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Advance the model a fixed number of cycles.
    Run {
        /// Number of cycles to simulate.
        #[arg(short, long, default_value_t = 64)]
        cycles: u64,

        /// Wall-clock delay between cycles in milliseconds (0 = free-running).
        #[arg(long, default_value_t = 0)]
        period_ms: u64,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<String>,

        /// Override the number of reservation stations.
        #[arg(long)]
        stations: Option<usize>,

        /// Override the number of compute stages in the loop body.
        #[arg(long)]
        loop_stages: Option<usize>,

        /// Override the cancellation probability.
        #[arg(long)]
        cancel_probability: Option<f64>,

        /// RNG seed for a reproducible cancellation pattern.
        #[arg(long)]
        seed: Option<u64>,

        /// Per-cycle output format.
        #[arg(long, value_enum, default_value = "tty")]
        renderer: RendererKind,

        /// Print statistics after the run.
        #[arg(long)]
        stats: bool,
    },

    /// Print the stage connection list and exit.
    Topology {
        /// JSON configuration file.
        #[arg(long)]
        config: Option<String>,

        /// Override the number of reservation stations.
        #[arg(long)]
        stations: Option<usize>,

        /// Override the number of compute stages in the loop body.
        #[arg(long)]
        loop_stages: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            cycles,
            period_ms,
            config,
            stations,
            loop_stages,
            cancel_probability,
            seed,
            renderer,
            stats,
        }) => cmd_run(&RunArgs {
            cycles,
            period_ms,
            config,
            stations,
            loop_stages,
            cancel_probability,
            seed,
            renderer,
            stats,
        }),
        Some(Commands::Topology {
            config,
            stations,
            loop_stages,
        }) => cmd_topology(config.as_deref(), stations, loop_stages),
        None => {
            eprintln!("loopsim — pass a subcommand");
            eprintln!();
            eprintln!("  loopsim run --cycles 32        Simulate 32 cycles");
            eprintln!("  loopsim run --period-ms 1500   Watch in slow motion");
            eprintln!("  loopsim topology               Print stage connections");
            eprintln!();
            eprintln!("  loopsim --help  for full options");
            process::exit(1);
        }
    }
}

struct RunArgs {
    cycles: u64,
    period_ms: u64,
    config: Option<String>,
    stations: Option<usize>,
    loop_stages: Option<usize>,
    cancel_probability: Option<f64>,
    seed: Option<u64>,
    renderer: RendererKind,
    stats: bool,
}

/// Loads the configuration file (if any) and applies flag overrides.
fn load_config(
    path: Option<&str>,
    stations: Option<usize>,
    loop_stages: Option<usize>,
    cancel_probability: Option<f64>,
    seed: Option<u64>,
) -> Config {
    let mut config = match path {
        Some(p) => Config::from_json_file(p).unwrap_or_else(|e| {
            eprintln!("Error loading config {p}: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };
    if let Some(n) = stations {
        config.pipeline.stations = n;
    }
    if let Some(n) = loop_stages {
        config.pipeline.loop_stages = n;
    }
    if let Some(p) = cancel_probability {
        config.source.cancel_probability = p;
    }
    if let Some(s) = seed {
        config.source.seed = Some(s);
    }
    config
}

/// Runs the model: ticks `cycles` times with the chosen renderer and pacing.
fn cmd_run(args: &RunArgs) {
    let config = load_config(
        args.config.as_deref(),
        args.stations,
        args.loop_stages,
        args.cancel_probability,
        args.seed,
    );

    let mut simulator = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let stdout = std::io::stdout();
    let mut renderer: Box<dyn Renderer> = match args.renderer {
        RendererKind::Tty => Box::new(TtyRenderer::new(stdout.lock())),
        RendererKind::Json => Box::new(JsonRenderer::new(stdout.lock())),
        RendererKind::None => Box::new(NullRenderer),
    };

    for _ in 0..args.cycles {
        if let Err(e) = simulator.tick(renderer.as_mut()) {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
        if args.period_ms > 0 {
            thread::sleep(Duration::from_millis(args.period_ms));
        }
    }
    drop(renderer);

    if args.stats {
        simulator.stats().print();
        std::io::stdout().flush().ok();
    }
}

/// Prints the stage connection list for the configured topology.
fn cmd_topology(config: Option<&str>, stations: Option<usize>, loop_stages: Option<usize>) {
    let config = load_config(config, stations, loop_stages, None, None);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    let pipeline = Pipeline::new(&config.pipeline);
    for (from, to) in pipeline.edges() {
        println!("{from} -> {to}");
    }
}
