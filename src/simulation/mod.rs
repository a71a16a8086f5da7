//! Simulation control and results
//!
//! This module drives the transit loop through time and collects what happened.
//!
//! # Overview
//!
//! - **SimulationEngine**: owns stops, buses and the clock; advances one minute per step
//! - **BatchRunner**: repeats a configuration with consecutive seeds
//! - **WaitStatistics**: wait samples and their per-stop means
//! - **SimulationError**: fatal run errors
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use transit_loop_simulator::simulation::*;
//! use transit_loop_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     simulation_length: 120,
//!     ..Default::default()
//! };
//!
//! let report = SimulationEngine::with_seed(config, 42).unwrap().run().unwrap();
//! assert_eq!(report.observations.len(), 120);
//! assert_eq!(
//!     report.statistics.total_served(),
//!     report.all_wait_samples().len() as u64
//! );
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod logging;
pub mod statistics;

// Re-export all public types for convenience
pub use batch::*;
pub use engine::*;
pub use error::*;
pub use logging::*;
pub use statistics::*;
