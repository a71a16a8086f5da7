//! Passenger exchange between a bus and a stop
//!
//! When a bus reaches a stop, a random number of riders alight, bounded below
//! by `occupancy / divisor` for that stop and above by the full occupancy.
//! Boarding then either drains the stop completely (when everyone waiting
//! fits) or fills the bus to capacity, leaving the rest queued.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::{SimulationError, SimulationResult};
use crate::transit::{Bus, ScheduledVisit, Stop};
use crate::types::{SimulationConfig, StopId};

/// Minutes one passenger spent queued before boarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSample {
    /// Stop the passenger boarded at
    pub stop: StopId,
    /// Minutes waited
    pub minutes: u32,
}

/// Result of one bus visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    /// The visit that was resolved
    pub visit: ScheduledVisit,
    /// Riders who left the bus
    pub alighting: u32,
    /// Riders who boarded
    pub boarded: u32,
    /// One sample per boarded rider, in boarding order
    pub wait_samples: Vec<WaitSample>,
}

/// Per-stop alighting and boarding rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangePolicy {
    min_departing_divisors: Vec<u32>,
}

impl ExchangePolicy {
    /// Create a policy from per-stop divisors
    pub fn new(min_departing_divisors: Vec<u32>) -> Self {
        Self { min_departing_divisors }
    }

    /// Create a policy from a simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.stops.iter().map(|stop| stop.min_departing_divisor).collect())
    }

    /// Inclusive bounds on the riders leaving a bus with `occupancy` at `stop`
    pub fn departing_range(&self, occupancy: u32, stop: StopId) -> SimulationResult<(u32, u32)> {
        let divisor = self.min_departing_divisors[stop.index()];
        let max = occupancy;
        let min = occupancy.checked_div(divisor).unwrap_or(u32::MAX);
        if min > max {
            return Err(SimulationError::InvalidDepartureRange { min, max });
        }
        Ok((min, max))
    }

    /// Exchange passengers between `bus` and `stop` for `visit`
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        bus: &mut Bus,
        stop: &mut Stop,
        visit: ScheduledVisit,
        rng: &mut R,
    ) -> SimulationResult<ExchangeOutcome> {
        let (min, max) = self.departing_range(bus.occupancy(), stop.id())?;
        let alighting = rng.gen_range(min..=max);
        bus.alight(alighting);

        // Either everyone waiting fits, or the bus leaves full.
        let boarding = if stop.waiting() <= bus.room() { stop.waiting() } else { bus.room() };

        let mut wait_samples = Vec::with_capacity(boarding as usize);
        for _ in 0..boarding {
            let arrived = stop.board_next()?;
            let minutes = visit.arrival_minute.checked_sub(arrived).ok_or(
                SimulationError::NegativeWait {
                    stop: stop.id(),
                    arrived,
                    served_at: visit.arrival_minute,
                },
            )?;
            bus.board_one();
            wait_samples.push(WaitSample { stop: stop.id(), minutes });
        }

        Ok(ExchangeOutcome { visit, alighting, boarded: boarding, wait_samples })
    }
}
