//! Passenger arrival processes
//!
//! Each stop owns an [`ArrivalProcess`] holding the minute mark of its next
//! passenger. A passenger joins the queue on any minute that is a multiple of
//! the stored mark; the mark is then redrawn as `now + U[low, high]`. Because
//! the new mark always exceeds the current minute, its first multiple is the
//! mark itself, so gaps between arrivals are fresh uniform draws rather than a
//! fixed period.

use rand::Rng;
use tracing::trace;

use crate::types::{ConfigValidationError, StopConfig, StopId};

/// Arrival schedule for a single stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalProcess {
    low: u32,
    high: u32,
    next_mark: u32,
}

impl ArrivalProcess {
    /// Create a process and draw its first arrival mark from `[low, high]`
    pub fn new<R: Rng + ?Sized>(
        stop: &StopConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigValidationError> {
        if stop.arrive_low == 0 || stop.arrive_low > stop.arrive_high {
            return Err(ConfigValidationError::InvalidArrivalRange {
                stop: stop.name.clone(),
                low: stop.arrive_low,
                high: stop.arrive_high,
            });
        }

        let next_mark = rng.gen_range(stop.arrive_low..=stop.arrive_high);
        Ok(Self { low: stop.arrive_low, high: stop.arrive_high, next_mark })
    }

    /// Minute mark the next arrival is tested against
    pub fn next_mark(&self) -> u32 {
        self.next_mark
    }

    /// Inclusive range the gap to the next arrival is drawn from
    pub fn range(&self) -> (u32, u32) {
        (self.low, self.high)
    }

    /// Report whether a passenger arrives at `time`, redrawing the mark if so
    pub fn poll<R: Rng + ?Sized>(&mut self, time: u32, rng: &mut R) -> bool {
        // next_mark >= low >= 1, so the remainder is always defined
        if time % self.next_mark != 0 {
            return false;
        }
        self.next_mark = time.saturating_add(rng.gen_range(self.low..=self.high));
        true
    }
}

/// Arrival processes for every stop on the loop
#[derive(Debug, Clone)]
pub struct RandomArrivalProcess {
    processes: Vec<ArrivalProcess>,
}

impl RandomArrivalProcess {
    /// Build one process per stop, drawing initial marks in route order
    pub fn from_stops<R: Rng + ?Sized>(
        stops: &[StopConfig],
        rng: &mut R,
    ) -> Result<Self, ConfigValidationError> {
        let processes = stops
            .iter()
            .map(|stop| ArrivalProcess::new(stop, &mut *rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { processes })
    }

    /// Whether a passenger arrives at `stop` at `time`
    pub fn next<R: Rng + ?Sized>(&mut self, stop: StopId, time: u32, rng: &mut R) -> bool {
        let process = &mut self.processes[stop.index()];
        let due = process.poll(time, rng);
        if due {
            trace!(stop = stop.index(), time, next_mark = process.next_mark(), "passenger arrival");
        }
        due
    }

    /// Process for a single stop
    pub fn process(&self, stop: StopId) -> &ArrivalProcess {
        &self.processes[stop.index()]
    }

    /// Number of stops covered
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether no stops are covered
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_range_fires_every_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let stop = StopConfig::new("Depot", 3, 3, 1);
        let mut process = ArrivalProcess::new(&stop, &mut rng).unwrap();
        assert_eq!(process.next_mark(), 3);

        let fired: Vec<u32> = (1..=30).filter(|&t| process.poll(t, &mut rng)).collect();
        assert_eq!(fired, vec![3, 6, 9, 12, 15, 18, 21, 24, 27, 30]);
    }

    #[test]
    fn test_gaps_stay_within_range() {
        let mut rng = StdRng::seed_from_u64(99);
        let stop = StopConfig::new("Library", 4, 10, 2);
        let mut process = ArrivalProcess::new(&stop, &mut rng).unwrap();

        let first = process.next_mark();
        assert!((4..=10).contains(&first));

        let fired: Vec<u32> = (1..=1000).filter(|&t| process.poll(t, &mut rng)).collect();
        assert_eq!(fired[0], first);
        for pair in fired.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((4..=10).contains(&gap), "gap {} out of range", gap);
        }
    }

    #[test]
    fn test_zero_low_bound_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let stop = StopConfig::new("Broken", 0, 5, 1);
        assert!(matches!(
            ArrivalProcess::new(&stop, &mut rng),
            Err(ConfigValidationError::InvalidArrivalRange { low: 0, high: 5, .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let stops = vec![StopConfig::new("A", 2, 3, 1), StopConfig::new("B", 6, 5, 1)];
        assert!(RandomArrivalProcess::from_stops(&stops, &mut rng).is_err());
    }

    #[test]
    fn test_per_stop_processes() {
        let mut rng = StdRng::seed_from_u64(5);
        let stops = vec![StopConfig::new("A", 2, 2, 1), StopConfig::new("B", 5, 5, 1)];
        let mut arrivals = RandomArrivalProcess::from_stops(&stops, &mut rng).unwrap();
        assert_eq!(arrivals.len(), 2);

        let a: Vec<u32> = (1..=10).filter(|&t| arrivals.next(StopId(0), t, &mut rng)).collect();
        assert_eq!(a, vec![2, 4, 6, 8, 10]);
        assert_eq!(arrivals.process(StopId(1)).next_mark(), 5);
        assert_eq!(arrivals.process(StopId(1)).range(), (5, 5));
    }
}
