//! Bus schedule clock
//!
//! A bus is due on any minute divisible by
//! `leg_duration * route_position + offset`, where `offset` staggers the fleet
//! along the route. The modulus grows by one leg on every visit, and the
//! minute a bus fires always equals its current modulus, so consecutive visits
//! by the same bus are exactly `leg_duration` apart. The served stop is
//! `(route_position - 1) mod num_stops`, taken before the position advances.

use serde::{Deserialize, Serialize};

use crate::transit::Bus;
use crate::types::{BusId, SimulationConfig, StopId};

/// A bus reaching a stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledVisit {
    /// Bus making the visit
    pub bus: BusId,
    /// Stop being served
    pub stop: StopId,
    /// Minute the bus is logically at the stop
    pub arrival_minute: u32,
    /// Leg count of the bus including this visit
    pub pass: u32,
}

/// Derives bus visits from elapsed time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusScheduleClock {
    leg_duration: u32,
    num_stops: usize,
    offsets: Vec<u32>,
}

impl BusScheduleClock {
    /// Create a clock with explicit per-bus offsets
    pub fn new(leg_duration: u32, num_stops: usize, offsets: Vec<u32>) -> Self {
        Self { leg_duration, num_stops, offsets }
    }

    /// Create a clock from a simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        // Validated configurations always have an offset; an unrepresentable one never fires
        let offsets = (0..config.num_buses)
            .map(|i| config.schedule_offset(BusId(i)).unwrap_or(u32::MAX))
            .collect();
        Self::new(config.leg_duration, config.num_stops(), offsets)
    }

    /// Schedule offset of a bus
    pub fn offset(&self, bus: BusId) -> u32 {
        self.offsets[bus.index()]
    }

    /// Minutes between consecutive stops
    pub fn leg_duration(&self) -> u32 {
        self.leg_duration
    }

    /// Modulus the bus is currently tested against, `None` on overflow
    pub fn modulus(&self, bus: &Bus) -> Option<u32> {
        self.leg_duration.checked_mul(bus.route_position())?.checked_add(self.offset(bus.id()))
    }

    /// Whether `bus` reaches a stop at `time`
    pub fn is_due(&self, bus: &Bus, time: u32) -> bool {
        // A zero or overflowing modulus never fires
        self.modulus(bus)
            .and_then(|modulus| time.checked_rem(modulus))
            .is_some_and(|rem| rem == 0)
    }

    /// Record a visit for a bus that is due, advancing its counters
    pub fn advance(&self, bus: &mut Bus) -> ScheduledVisit {
        let stop = StopId((bus.route_position() as usize - 1) % self.num_stops);
        bus.complete_leg();

        let pass = bus.legs_completed();
        ScheduledVisit {
            bus: bus.id(),
            stop,
            arrival_minute: self.leg_duration.saturating_mul(pass).saturating_add(self.offset(bus.id())),
            pass,
        }
    }

    /// Advance `bus` if it is due at `time`
    pub fn poll(&self, bus: &mut Bus, time: u32) -> Option<ScheduledVisit> {
        if self.is_due(bus, time) {
            Some(self.advance(bus))
        } else {
            None
        }
    }
}
