//! Buses circulating the loop

use crate::types::BusId;

/// A bus with a fixed number of seats
///
/// `route_position` starts at 1 and counts the stop the bus is heading to;
/// `legs_completed` counts visits made so far. Both advance together once per
/// visit, so after a visit `legs_completed` equals the position the bus just
/// served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    id: BusId,
    capacity: u32,
    occupancy: u32,
    legs_completed: u32,
    route_position: u32,
}

impl Bus {
    /// Create an empty bus at the start of its route
    pub fn new(id: BusId, capacity: u32) -> Self {
        Self { id, capacity, occupancy: 0, legs_completed: 0, route_position: 1 }
    }

    /// Bus identifier
    pub fn id(&self) -> BusId {
        self.id
    }

    /// Seats on the bus
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Riders currently aboard
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Empty seats
    pub fn room(&self) -> u32 {
        self.capacity - self.occupancy
    }

    /// Whether every seat is taken
    pub fn is_full(&self) -> bool {
        self.occupancy == self.capacity
    }

    /// Visits completed so far
    pub fn legs_completed(&self) -> u32 {
        self.legs_completed
    }

    /// Unbounded position along the route, starting at 1
    pub fn route_position(&self) -> u32 {
        self.route_position
    }

    pub(crate) fn complete_leg(&mut self) {
        self.legs_completed += 1;
        self.route_position += 1;
    }

    pub(crate) fn alight(&mut self, riders: u32) {
        debug_assert!(riders <= self.occupancy);
        self.occupancy -= riders;
    }

    pub(crate) fn board_one(&mut self) {
        debug_assert!(self.occupancy < self.capacity);
        self.occupancy += 1;
    }
}
