//! Configuration structures for the transit loop simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the route, the fleet, and the passenger arrival behavior.

use super::{BusId, OutputFormat};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default parameters of the campus loop
pub mod defaults {
    /// Seats per bus
    pub const CAPACITY: u32 = 40;

    /// Length of one simulated day in minutes
    pub const SIMULATION_LENGTH: u32 = 1440;

    /// Buses in circulation
    pub const NUM_BUSES: usize = 4;

    /// Minutes for a bus to travel from one stop to the next
    pub const LEG_DURATION: u32 = 20;

    /// Stop name, arrival range low, arrival range high, departing divisor
    pub const STOPS: [(&str, u32, u32, u32); 5] = [
        ("St. John Arena", 7, 11, 6),
        ("Knowlton Hall", 12, 14, 6),
        ("the RPAC", 3, 7, 2),
        ("Thompson Library", 4, 10, 2),
        ("the Student Union", 8, 12, 3),
    ];
}

/// Per-stop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopConfig {
    /// Display name used in the end-of-run report
    pub name: String,
    /// Shortest gap between passenger arrivals, in minutes (inclusive)
    pub arrive_low: u32,
    /// Longest gap between passenger arrivals, in minutes (inclusive)
    pub arrive_high: u32,
    /// Divisor of a bus's occupancy giving the minimum number of riders that
    /// alight at this stop
    pub min_departing_divisor: u32,
}

impl StopConfig {
    /// Create a stop configuration
    pub fn new(
        name: impl Into<String>,
        arrive_low: u32,
        arrive_high: u32,
        min_departing_divisor: u32,
    ) -> Self {
        Self { name: name.into(), arrive_low, arrive_high, min_departing_divisor }
    }
}

/// The stops of the default loop
pub fn default_stops() -> Vec<StopConfig> {
    defaults::STOPS
        .iter()
        .map(|&(name, low, high, divisor)| StopConfig::new(name, low, high, divisor))
        .collect()
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "transit-loop-simulator",
    version = "1.0.0",
    about = "Transit Loop Simulator - Simulates buses circulating a fixed loop of stops",
    long_about = "Simulates a fixed number of buses circulating a fixed loop of stops minute by minute. Passengers arrive at each stop at random intervals, buses exchange riders under a capacity limit, and the run reports the average wait per stop.

EXAMPLES:
    # Run with default settings
    transit-loop-simulator

    # Use a configuration file
    transit-loop-simulator --config loop.json

    # Override specific settings
    transit-loop-simulator --num-buses 6 --capacity 30 --seed 42

    # Write wait samples for external analysis
    transit-loop-simulator --seed 42 --output-dir results

    # Generate configuration template
    transit-loop-simulator --print-config > my-loop.json

    # Validate configuration without running
    transit-loop-simulator --config my-loop.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)

    Per-stop settings (names, arrival ranges, departing divisors) can only be
    changed through a configuration file."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Seats per bus
    #[arg(long, help = "Seats per bus", long_help = "Capacity of every bus. Must be greater than 0. Default: 40")]
    pub capacity: Option<u32>,

    /// Length of the simulation in minutes
    #[arg(
        long,
        help = "Length of the simulation in minutes",
        long_help = "Number of simulated minutes. Must be greater than 0. Default: 1440"
    )]
    pub simulation_length: Option<u32>,

    /// Buses in circulation
    #[arg(long, help = "Number of buses in circulation")]
    pub num_buses: Option<usize>,

    /// Minutes between consecutive stops
    #[arg(long, help = "Minutes for a bus to travel between consecutive stops")]
    pub leg_duration: Option<u32>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Format of the per-minute observations
    #[arg(
        long,
        help = "Observation format (table or json)",
        long_help = "Format of the per-minute observations written to stdout. Supported formats: table, json. Default: table"
    )]
    pub output_format: Option<String>,

    /// Directory for wait-sample files
    #[arg(
        long,
        help = "Directory to write wait-sample files into",
        long_help = "Directory that receives all-data.csv, one data<N>.csv per stop and summary.json. Nothing is written when omitted."
    )]
    pub output_dir: Option<String>,

    /// Number of independent replications
    #[arg(long, help = "Number of independent replications to run")]
    pub runs: Option<usize>,

    /// Suppress the per-minute table
    #[arg(long, help = "Do not print per-minute observations")]
    pub no_table: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Seats per bus
    pub capacity: Option<u32>,

    /// Length of the simulation in minutes
    pub simulation_length: Option<u32>,

    /// Buses in circulation
    pub num_buses: Option<usize>,

    /// Minutes between consecutive stops
    pub leg_duration: Option<u32>,

    /// Stops on the loop, in route order
    pub stops: Option<Vec<StopConfig>>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Format of the per-minute observations
    pub output_format: Option<OutputFormat>,

    /// Directory for wait-sample files
    pub output_directory: Option<String>,

    /// Number of independent replications
    pub runs: Option<usize>,
}

/// Configuration for the transit loop simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Seats per bus
    pub capacity: u32,

    /// Length of the simulation in minutes
    pub simulation_length: u32,

    /// Buses in circulation
    pub num_buses: usize,

    /// Minutes for a bus to travel from one stop to the next
    pub leg_duration: u32,

    /// Stops on the loop, in route order
    pub stops: Vec<StopConfig>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Format of the per-minute observations
    pub output_format: OutputFormat,

    /// Directory for wait-sample files
    pub output_directory: Option<String>,

    /// Number of independent replications
    pub runs: usize,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// Unknown observation format on the command line
    #[error("{0}")]
    InvalidOutputFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigValidationError {
    /// Bus capacity is invalid
    #[error("Capacity must be greater than 0, got {0}")]
    InvalidCapacity(u32),

    /// Simulation length is invalid
    #[error("Simulation length must be greater than 0, got {0}")]
    InvalidSimulationLength(u32),

    /// Bus count is invalid
    #[error("Number of buses must be greater than 0, got {0}")]
    InvalidBusCount(usize),

    /// No stops configured
    #[error("At least one stop must be configured")]
    NoStops,

    /// Leg duration is invalid
    #[error("Leg duration must be greater than 0, got {0}")]
    InvalidLegDuration(u32),

    /// Arrival range is invalid
    #[error("Invalid arrival range for {stop}: [{low}, {high}] (low must be >= 1 and <= high)")]
    InvalidArrivalRange {
        /// Name of the offending stop
        stop: String,
        /// Configured lower bound
        low: u32,
        /// Configured upper bound
        high: u32,
    },

    /// Departing divisor is invalid
    #[error("Minimum departing divisor for {stop} must be greater than 0")]
    InvalidDepartingDivisor {
        /// Name of the offending stop
        stop: String,
    },

    /// Replication count is invalid
    #[error("Number of runs must be greater than 0, got {0}")]
    InvalidRunCount(usize),

    /// A bus schedule does not fit in the minute range
    #[error("Schedule for {0} exceeds the representable minute range")]
    ScheduleOverflow(BusId),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            simulation_length: defaults::SIMULATION_LENGTH,
            num_buses: defaults::NUM_BUSES,
            leg_duration: defaults::LEG_DURATION,
            stops: default_stops(),
            seed: None,
            output_format: OutputFormat::default(),
            output_directory: None,
            runs: 1,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        Self::apply_cli_overrides(&mut config, args)?;

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            capacity: config_file.capacity.unwrap_or(defaults.capacity),
            simulation_length: config_file
                .simulation_length
                .unwrap_or(defaults.simulation_length),
            num_buses: config_file.num_buses.unwrap_or(defaults.num_buses),
            leg_duration: config_file.leg_duration.unwrap_or(defaults.leg_duration),
            stops: config_file.stops.unwrap_or(defaults.stops),
            seed: config_file.seed.or(defaults.seed),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            output_directory: config_file.output_directory.or(defaults.output_directory),
            runs: config_file.runs.unwrap_or(defaults.runs),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) -> Result<(), ConfigError> {
        if let Some(value) = args.capacity {
            config.capacity = value;
        }
        if let Some(value) = args.simulation_length {
            config.simulation_length = value;
        }
        if let Some(value) = args.num_buses {
            config.num_buses = value;
        }
        if let Some(value) = args.leg_duration {
            config.leg_duration = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.output_format {
            config.output_format = value.parse().map_err(ConfigError::InvalidOutputFormat)?;
        }
        if let Some(value) = args.output_dir {
            config.output_directory = Some(value);
        }
        if let Some(value) = args.runs {
            config.runs = value;
        }
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.capacity == 0 {
            return Err(ConfigValidationError::InvalidCapacity(self.capacity));
        }

        if self.simulation_length == 0 {
            return Err(ConfigValidationError::InvalidSimulationLength(self.simulation_length));
        }

        if self.num_buses == 0 {
            return Err(ConfigValidationError::InvalidBusCount(self.num_buses));
        }

        if self.stops.is_empty() {
            return Err(ConfigValidationError::NoStops);
        }

        if self.leg_duration == 0 {
            return Err(ConfigValidationError::InvalidLegDuration(self.leg_duration));
        }

        for stop in &self.stops {
            if stop.arrive_low == 0 || stop.arrive_low > stop.arrive_high {
                return Err(ConfigValidationError::InvalidArrivalRange {
                    stop: stop.name.clone(),
                    low: stop.arrive_low,
                    high: stop.arrive_high,
                });
            }
            if stop.min_departing_divisor == 0 {
                return Err(ConfigValidationError::InvalidDepartingDivisor {
                    stop: stop.name.clone(),
                });
            }
        }

        if self.runs == 0 {
            return Err(ConfigValidationError::InvalidRunCount(self.runs));
        }

        // A bus first fires at leg + offset; every later modulus is at most
        // the last simulated minute plus one leg.
        let horizon = u64::from(self.simulation_length) + u64::from(self.leg_duration);
        if horizon > u64::from(u32::MAX) {
            return Err(ConfigValidationError::ScheduleOverflow(BusId(0)));
        }
        for bus in (0..self.num_buses).map(BusId) {
            let first = self
                .schedule_offset(bus)
                .and_then(|offset| offset.checked_add(self.leg_duration));
            if first.is_none() {
                return Err(ConfigValidationError::ScheduleOverflow(bus));
            }
        }

        Ok(())
    }

    /// Number of stops on the loop
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    fn route_spacing(&self) -> Option<u64> {
        let buses = u64::try_from(self.num_buses).ok().filter(|&buses| buses > 0)?;
        let route_minutes = u64::from(self.leg_duration).checked_mul(self.stops.len() as u64)?;
        Some(route_minutes / buses)
    }

    /// Minutes separating consecutive buses on the route
    ///
    /// `None` when there are no buses or the spacing does not fit in `u32`.
    pub fn bus_spacing(&self) -> Option<u32> {
        u32::try_from(self.route_spacing()?).ok()
    }

    /// Stagger applied to a bus's schedule so the fleet is spread along the route
    ///
    /// `None` when the offset does not fit in `u32`.
    pub fn schedule_offset(&self, bus: BusId) -> Option<u32> {
        let offset = self.route_spacing()?.checked_mul(bus.index() as u64)?;
        u32::try_from(offset).ok()
    }

    /// Stop names in route order
    pub fn stop_names(&self) -> Vec<&str> {
        self.stops.iter().map(|stop| stop.name.as_str()).collect()
    }
}
