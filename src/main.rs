//! guest-swarm command line.
//!
//! Builds the tokio runtime explicitly, runs a [`Driver`] on it, stops the
//! driver on Ctrl+C, and prints the final summary.

// ============================================================================
// Imports
// ============================================================================

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use guest_swarm::{Driver, DriverBuilder, Result, RunSummary};
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// How long to wait for lingering tasks after the run returns.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Cli
// ============================================================================

/// Load test for the wedding guessing game server.
#[derive(Debug, Parser)]
#[command(name = "guest-swarm")]
#[command(about = "Simulate many wedding guests guessing over WebSocket", long_about = None)]
#[command(version)]
struct Cli {
    /// Game server base URL; sessions connect to <URL>/ws?uuid=<id>
    #[arg(short, long, env = "GUEST_SWARM_URL", default_value = "ws://localhost:8080")]
    url: String,

    /// Number of concurrent guest sessions
    #[arg(short = 'n', long, env = "GUEST_SWARM_CONNECTIONS", default_value_t = 200)]
    connections: usize,

    /// Stop after this many seconds (runs until Ctrl+C when omitted)
    #[arg(short, long, value_name = "SECS")]
    duration: Option<u64>,

    /// Per-cycle chance that a guest leaves and rejoins
    #[arg(long, default_value_t = 0.01, conflicts_with = "guess_only")]
    remove_name_probability: f64,

    /// Guests only guess and never leave
    #[arg(long)]
    guess_only: bool,

    /// WebSocket handshake timeout
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    connect_timeout: u64,

    /// Progress log interval, 0 disables progress lines
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    report_interval: u64,

    /// Seed for reproducible guest behavior
    #[arg(long)]
    seed: Option<u64>,

    /// Runtime worker threads (defaults to the number of cores)
    #[arg(long)]
    worker_threads: Option<usize>,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Maps the flags onto a driver builder.
    fn to_builder(&self) -> DriverBuilder {
        let mut builder = Driver::builder()
            .url(&self.url)
            .connections(self.connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout))
            .remove_name_probability(self.remove_name_probability);

        if self.guess_only {
            builder = builder.guess_only();
        }
        if let Some(secs) = self.duration {
            builder = builder.run_for(Duration::from_secs(secs));
        }
        builder = match self.report_interval {
            0 => builder.no_reports(),
            secs => builder.report_every(Duration::from_secs(secs)),
        };
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }

        builder
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing; `RUST_LOG` overrides the defaults.
fn init_logging(debug: bool) {
    let default = if debug {
        "guest_swarm=debug"
    } else {
        "guest_swarm=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Builds the multi-threaded runtime the sessions run on.
fn build_runtime(worker_threads: Option<usize>) -> Result<Runtime> {
    let mut builder = RuntimeBuilder::new_multi_thread();
    builder.enable_all().thread_name("guest-swarm");
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads.max(1));
    }
    Ok(builder.build()?)
}

/// Runs the driver until it finishes or Ctrl+C stops it.
async fn run_until_interrupted(driver: Driver) -> Result<RunSummary> {
    let stopper = driver.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received");
                stopper.shutdown();
            }
            Err(e) => warn!(error = %e, "Cannot listen for Ctrl+C"),
        }
    });

    driver.run().await
}

fn run(cli: &Cli) -> Result<()> {
    let driver = cli.to_builder().build()?;
    let runtime = build_runtime(cli.worker_threads)?;

    let summary = runtime.block_on(run_until_interrupted(driver));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    let summary = summary?;

    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{summary}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Load test aborted");
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
