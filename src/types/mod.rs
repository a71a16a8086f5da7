//! Core types and identifiers for the transit loop simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: index newtypes for stops and buses, UUIDs for runs
//! - **Enums**: observation output formats
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use transit_loop_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     capacity: 30,
//!     num_buses: 3,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.schedule_offset(BusId(1)), Some(33));
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
