//! octofault-sim - replay a scripted robot through octofault
//!
//! Reads a scenario file describing simulated devices and their readings per
//! tick, registers every device through the dispatcher and runs the fault
//! manager for a number of ticks, printing what the telemetry sink received.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod error;
mod output;
mod scenario;
mod sim;

use anyhow::{Context, Result};
use clap::Parser;
use octofault_devices::ManualClock;
use octofault_telemetry::{FanoutSink, MemorySink, TelemetrySink, TracingSink};
use octofault_watchdog::prelude::{DeviceDispatcher, FaultAccumulation, Octofault, power_extension};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::scenario::Scenario;
use crate::sim::TickCursor;

/// Exit code for a scenario that cannot be loaded.
const EXIT_SCENARIO: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "octofault-sim")]
#[command(about = "Replay a scripted robot through the octofault fault manager")]
#[command(version)]
struct Cli {
    /// Scenario file (.yaml, .yml or .json)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Number of ticks to run (defaults to the longest device script)
    #[arg(short, long)]
    ticks: Option<usize>,

    /// Time between ticks in milliseconds
    #[arg(long, default_value_t = 50)]
    interval_ms: u64,

    /// Keep fault reasons until a healthy tick instead of clearing each tick
    #[arg(long)]
    sticky: bool,

    /// Sleep between ticks and use the system clock instead of simulated time
    #[arg(long)]
    realtime: bool,

    /// Print one JSON object per tick
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let scenario = match Scenario::load(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_SCENARIO);
        }
    };

    match run(&cli, &scenario) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, scenario: &Scenario) -> Result<()> {
    let mut config = scenario.config.clone();
    if cli.sticky {
        config.monitor.accumulation = FaultAccumulation::Sticky;
    }
    let ticks = cli.ticks.unwrap_or_else(|| scenario.script_len().max(1));
    let interval = Duration::from_millis(cli.interval_ms);

    let cursor = Arc::new(TickCursor::new());
    let registry = scenario.build_registry(&cursor);

    let memory = Arc::new(MemorySink::new());
    let sink: Arc<dyn TelemetrySink> = Arc::new(
        FanoutSink::new()
            .with(memory.clone())
            .with(Arc::new(TracingSink::new())),
    );

    let clock = Arc::new(ManualClock::new());
    let mut dispatcher = DeviceDispatcher::new();
    if !cli.realtime {
        dispatcher = dispatcher.with_clock(clock.clone());
    }
    if scenario.power_monitors {
        dispatcher = dispatcher.with_extension(power_extension);
    }

    let mut octofault = Octofault::with_dispatcher(registry, sink, config, dispatcher)
        .context("Failed to set up the fault manager")?;
    tracing::info!(
        monitors = octofault.manager().len(),
        ticks,
        interval_ms = cli.interval_ms,
        "Simulation starting"
    );

    let setup = memory.drain();
    if cli.json {
        output::print_setup_json(octofault.manager().len(), &setup);
    } else {
        output::print_setup_human(octofault.manager().len(), &setup);
    }

    for tick in 0..ticks {
        if tick > 0 {
            if cli.realtime {
                std::thread::sleep(interval);
            } else {
                clock.advance(interval);
            }
        }
        cursor.set(tick);

        let report = octofault.tick();
        let lines = memory.drain();
        if cli.json {
            output::print_tick_json(tick, &report, &lines);
        } else {
            output::print_tick_human(tick, &report, &lines);
        }
    }

    if !cli.json {
        output::print_summary_human(&octofault.manager().health_summary());
    }
    Ok(())
}
