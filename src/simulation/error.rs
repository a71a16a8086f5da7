//! Error types and handling
//!
//! This module contains error types for the simulation. Every error is fatal to
//! the run that raised it: the simulation is a single deterministic pass, and a
//! failed step leaves stop and bus state inconsistent.

use crate::types::{ConfigValidationError, StopId};
use thiserror::Error;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(#[from] ConfigValidationError),

    /// A boarding passenger was requested from an empty stop queue
    #[error("Stop queue for {stop} is empty")]
    EmptyQueue {
        /// Stop whose queue was drained
        stop: StopId,
    },

    /// The alighting range computed for a visit is inverted
    #[error("Invalid departing range: minimum {min} exceeds maximum {max}")]
    InvalidDepartureRange {
        /// Minimum riders leaving the bus
        min: u32,
        /// Maximum riders leaving the bus
        max: u32,
    },

    /// A passenger would board before arriving at the stop
    #[error("Passenger at {stop} arrived at minute {arrived} but was served at minute {served_at}")]
    NegativeWait {
        /// Stop where the passenger waited
        stop: StopId,
        /// Minute the passenger joined the queue
        arrived: u32,
        /// Minute the bus was logically at the stop
        served_at: u32,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(error: ConfigValidationError) -> Self {
        Self::ConfigurationError(error)
    }

    /// Create an empty queue error
    pub fn empty_queue(stop: StopId) -> Self {
        Self::EmptyQueue { stop }
    }

    /// Whether the error signals a broken internal invariant rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SimulationError::EmptyQueue { .. }
                | SimulationError::InvalidDepartureRange { .. }
                | SimulationError::NegativeWait { .. }
        )
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::EmptyQueue { .. } => "Stop Queue",
            SimulationError::InvalidDepartureRange { .. } => "Exchange Policy",
            SimulationError::NegativeWait { .. } => "Wait Time",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
