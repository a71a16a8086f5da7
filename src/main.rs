// Transit Loop Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/transit-loop-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/transit-loop-simulator --num-buses 6 --seed 42 --output-dir results --verbose
// ```

use std::io::{self, BufWriter};
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use transit_loop_simulator::output::{ObservationTable, SampleWriter};
use transit_loop_simulator::simulation::{BatchRunner, LoggingConfig, SimulationEngine, SimulationReport};
use transit_loop_simulator::types::config::CliArgs;
use transit_loop_simulator::types::SimulationConfig;

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Transit Loop Simulator");

    let print_table = !args.no_table;
    let dry_run = args.dry_run;

    let config = match SimulationConfig::from_cli_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    let result = if config.runs > 1 {
        run_batch(config)
    } else {
        run_single(config, print_table)
    };

    if let Err(e) = result {
        error!("Simulation failed: {:#}", e);
        eprintln!("Simulation failed: {:#}", e);
        process::exit(1);
    }

    info!("Transit Loop Simulator completed successfully");
}

/// Run one simulation, print its table and report, and persist its samples
fn run_single(config: SimulationConfig, print_table: bool) -> anyhow::Result<()> {
    let output_directory = config.output_directory.clone();
    let table = ObservationTable::from_config(&config);

    let report = SimulationEngine::from_config(config)
        .context("Failed to initialize simulation")?
        .run()
        .context("Simulation run failed")?;

    if print_table {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        table
            .write_all(&mut writer, &report.observations)
            .context("Failed to write observations")?;
    }

    print_run_report(&report);

    if let Some(directory) = output_directory {
        let written = SampleWriter::new(&directory)
            .write_report(&report)
            .with_context(|| format!("Failed to write samples to '{}'", directory))?;
        eprintln!("Wrote {} files to {}", written.len(), directory);
    }

    Ok(())
}

/// Run every replication, persisting each run as it finishes
fn run_batch(config: SimulationConfig) -> anyhow::Result<()> {
    let writer = config.output_directory.as_deref().map(SampleWriter::new);
    let runner = BatchRunner::new(config).context("Failed to initialize batch")?;

    let summary = runner
        .run_with(|index, report| {
            eprintln!(
                "Run {} of {} complete (seed {}): {} passengers served",
                index + 1,
                runner.config().runs,
                report.seed.map_or_else(|| "unknown".to_string(), |s| s.to_string()),
                report.statistics.total_served()
            );
            if let Some(writer) = &writer {
                writer.for_run(index).write_report(report)?;
            }
            Ok(())
        })
        .context("Batch run failed")?;

    eprintln!();
    eprint!("{}", summary);

    if let Some(writer) = &writer {
        let path = writer
            .write_batch_summary(&summary)
            .context("Failed to write batch summary")?;
        eprintln!("Batch summary written to {}", path.display());
    }

    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Transit Loop Simulator");
    eprintln!("======================");
    eprintln!("Buses circulating a fixed loop of stops, minute by minute");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Simulation Length: {} minutes", config.simulation_length);
    eprintln!("  Buses: {} (capacity {})", config.num_buses, config.capacity);
    eprintln!("  Leg Duration: {} minutes", config.leg_duration);
    if let Some(spacing) = config.bus_spacing() {
        eprintln!("  Bus Spacing: {} minutes", spacing);
    }
    eprintln!("  Stops:");
    for (index, stop) in config.stops.iter().enumerate() {
        eprintln!(
            "    {}. {} (arrivals every {}-{} min, departing divisor {})",
            index + 1,
            stop.name,
            stop.arrive_low,
            stop.arrive_high,
            stop.min_departing_divisor
        );
    }
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(directory) = &config.output_directory {
        eprintln!("  Output Directory: {}", directory);
    }
    if config.runs > 1 {
        eprintln!("  Runs: {}", config.runs);
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

/// Print the end-of-run report
fn print_run_report(report: &SimulationReport) {
    eprintln!();
    eprint!("{}", report.statistics);
    if let Some(seed) = report.seed {
        eprintln!("Seed: {} (rerun with --seed {} to reproduce)", seed, seed);
    }
}
