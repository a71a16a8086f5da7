//! Transit Loop Simulator
//!
//! A discrete-time simulation of a fixed-route bus loop that measures how long
//! passengers wait at each stop.
//!
//! # Overview
//!
//! Buses circulate over an ordered ring of stops on a staggered schedule.
//! Passengers arrive at each stop at random intervals and queue in FIFO order.
//! When a bus reaches a stop some riders alight, then waiting passengers board
//! up to the bus capacity. Every boarded passenger yields one wait sample, and
//! the run reports the mean wait per stop.
//!
//! ## Key Features
//!
//! - **Minute-resolution clock**: one observation of every queue and bus per minute
//! - **Staggered schedule**: buses start evenly spaced around the loop
//! - **Capacity-aware boarding**: a visit drains the stop or fills the bus
//! - **Reproducible runs**: all randomness flows from one seeded generator
//! - **Batch runs**: repeat a configuration with consecutive seeds
//! - **Sample export**: pooled and per-stop wait samples as CSV, summaries as JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use transit_loop_simulator::*;
//!
//! // The default loop: five stops, four buses, a simulated day
//! let config = SimulationConfig {
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let report = SimulationEngine::from_config(config)?.run()?;
//! for summary in report.statistics.stop_summaries() {
//!     println!("{}", summary);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums, and configuration
//! - [`transit`]: Stops, buses, arrivals, the schedule clock, and passenger exchange
//! - [`simulation`]: The engine, batch runs, statistics, errors, and logging
//! - [`output`]: Observation tables and sample files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │  Transit    │    │ Simulation  │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Arrivals    │◄───┤ Engine      │
//! │ Enums       │    │ Stops, Bus  │    │ Batch       │
//! │ Config      │    │ Schedule    │    │ Statistics  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                              ▲
//!                                              │
//!                                       ┌─────────────┐
//!                                       │   Output    │
//!                                       │             │
//!                                       │ Table       │
//!                                       │ Samples     │
//!                                       └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod output;
pub mod simulation;
pub mod transit;
pub mod types;

// Core types and identifiers
pub use types::{
    BusId,
    ConfigValidationError,
    OutputFormat,
    RunId,
    // Configuration
    SimulationConfig,
    StopConfig,
    StopId,
};

// Transit loop components
pub use transit::{
    ArrivalProcess, Bus, BusScheduleClock, ExchangeOutcome, ExchangePolicy, RandomArrivalProcess,
    ScheduledVisit, Stop, StopQueue, WaitSample,
};

// Simulation types and functionality
pub use simulation::{
    run_simulation, BatchRunner, BatchSummary, Observation, RunSummary, SimulationEngine,
    SimulationError, SimulationReport, SimulationResult, StopWaitSummary, WaitStatistics,
};

// Output writers
pub use output::{ObservationTable, SampleWriter};
