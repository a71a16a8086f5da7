//! Stops and their passenger queues

use std::collections::VecDeque;

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::StopId;

/// FIFO of the minutes at which waiting passengers joined a stop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopQueue {
    arrivals: VecDeque<u32>,
}

impl StopQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a passenger who arrived at `time`
    pub fn enqueue(&mut self, time: u32) {
        self.arrivals.push_back(time);
    }

    /// Number of passengers waiting
    pub fn size(&self) -> usize {
        self.arrivals.len()
    }

    /// Whether nobody is waiting
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Remove the earliest arrival
    pub fn dequeue_oldest(&mut self) -> Option<u32> {
        self.arrivals.pop_front()
    }

    /// Arrival minutes, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.arrivals.iter()
    }
}

/// A stop on the loop
///
/// The waiting count is the queue length, so the two can never disagree.
#[derive(Debug, Clone)]
pub struct Stop {
    id: StopId,
    name: String,
    queue: StopQueue,
}

impl Stop {
    /// Create an empty stop
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), queue: StopQueue::new() }
    }

    /// Stop identifier
    pub fn id(&self) -> StopId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Passengers currently waiting
    pub fn waiting(&self) -> u32 {
        self.queue.size() as u32
    }

    /// Read access to the queue
    pub fn queue(&self) -> &StopQueue {
        &self.queue
    }

    /// Record a passenger joining the queue at `time`
    pub fn arrive(&mut self, time: u32) {
        self.queue.enqueue(time);
    }

    /// Remove the longest-waiting passenger, returning their arrival minute
    pub fn board_next(&mut self) -> SimulationResult<u32> {
        self.queue.dequeue_oldest().ok_or_else(|| SimulationError::empty_queue(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = StopQueue::new();
        queue.enqueue(3);
        queue.enqueue(7);
        queue.enqueue(7);
        queue.enqueue(12);

        assert_eq!(queue.size(), 4);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![3, 7, 7, 12]);
        assert_eq!(queue.dequeue_oldest(), Some(3));
        assert_eq!(queue.dequeue_oldest(), Some(7));
        assert_eq!(queue.size(), 2);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = StopQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue_oldest(), None);
    }

    #[test]
    fn test_stop_waiting_tracks_queue() {
        let mut stop = Stop::new(StopId(2), "the RPAC");
        assert_eq!(stop.waiting(), 0);

        stop.arrive(4);
        stop.arrive(9);
        assert_eq!(stop.waiting(), 2);
        assert_eq!(stop.waiting() as usize, stop.queue().size());

        assert_eq!(stop.board_next().unwrap(), 4);
        assert_eq!(stop.waiting(), 1);
    }

    #[test]
    fn test_board_from_empty_stop_fails() {
        let mut stop = Stop::new(StopId(1), "Knowlton Hall");
        let err = stop.board_next().unwrap_err();
        assert!(matches!(err, SimulationError::EmptyQueue { stop } if stop == StopId(1)));
    }
}
