//! Wait-time statistics
//!
//! Collects every [`WaitSample`] produced by the exchange policy, keeping a
//! chronological pool per stop and across all stops, and reduces them to the
//! mean wait per stop once the run is over.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transit::WaitSample;
use crate::types::StopId;

/// Served-passenger totals and the mean wait at one stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopWaitSummary {
    /// Stop identifier
    pub stop: StopId,
    /// Stop display name
    pub name: String,
    /// Passengers who boarded here
    pub served: u64,
    /// Sum of their waits in minutes
    pub total_wait: u64,
    /// Mean wait in minutes, `None` when nobody was served
    pub mean_wait: Option<f64>,
}

impl fmt::Display for StopWaitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean_wait {
            Some(mean) => write!(f, "The average time waited at {} is {:.2} minutes.", self.name, mean),
            None => write!(
                f,
                "The average time waited at {} is undefined (no data: no passengers were served).",
                self.name
            ),
        }
    }
}

/// Accumulates wait samples by stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitStatistics {
    stop_names: Vec<String>,
    served: Vec<u64>,
    total_wait: Vec<u64>,
    samples_by_stop: Vec<Vec<u32>>,
    all_samples: Vec<u32>,
}

impl WaitStatistics {
    /// Create empty statistics for the named stops
    pub fn new(stop_names: Vec<String>) -> Self {
        let stops = stop_names.len();
        Self {
            stop_names,
            served: vec![0; stops],
            total_wait: vec![0; stops],
            samples_by_stop: vec![Vec::new(); stops],
            all_samples: Vec::new(),
        }
    }

    /// Record one boarded passenger
    pub fn record(&mut self, sample: WaitSample) {
        let index = sample.stop.index();
        self.served[index] += 1;
        self.total_wait[index] += u64::from(sample.minutes);
        self.samples_by_stop[index].push(sample.minutes);
        self.all_samples.push(sample.minutes);
    }

    /// Record a batch of samples in order
    pub fn record_all<'a>(&mut self, samples: impl IntoIterator<Item = &'a WaitSample>) {
        for sample in samples {
            self.record(*sample);
        }
    }

    /// Number of stops tracked
    pub fn num_stops(&self) -> usize {
        self.stop_names.len()
    }

    /// Passengers served at a stop
    pub fn count_served(&self, stop: StopId) -> u64 {
        self.served[stop.index()]
    }

    /// Total minutes waited by passengers served at a stop
    pub fn total_wait(&self, stop: StopId) -> u64 {
        self.total_wait[stop.index()]
    }

    /// Passengers served across all stops
    pub fn total_served(&self) -> u64 {
        self.served.iter().sum()
    }

    /// Mean wait at a stop, or `None` if nobody was served there
    pub fn mean_wait(&self, stop: StopId) -> Option<f64> {
        let served = self.count_served(stop);
        if served == 0 {
            None
        } else {
            Some(self.total_wait(stop) as f64 / served as f64)
        }
    }

    /// Mean wait across every served passenger
    pub fn overall_mean_wait(&self) -> Option<f64> {
        let served = self.total_served();
        if served == 0 {
            None
        } else {
            Some(self.total_wait.iter().sum::<u64>() as f64 / served as f64)
        }
    }

    /// Longest single wait recorded
    pub fn max_wait(&self) -> Option<u32> {
        self.all_samples.iter().copied().max()
    }

    /// Wait samples at a stop, in the order they were recorded
    pub fn samples_for(&self, stop: StopId) -> &[u32] {
        &self.samples_by_stop[stop.index()]
    }

    /// Wait samples for every stop, indexed by stop
    pub fn samples_by_stop(&self) -> &[Vec<u32>] {
        &self.samples_by_stop
    }

    /// Every wait sample, in the order it was recorded
    pub fn all_samples(&self) -> &[u32] {
        &self.all_samples
    }

    /// Per-stop summaries in route order
    pub fn stop_summaries(&self) -> Vec<StopWaitSummary> {
        self.stop_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let stop = StopId(index);
                StopWaitSummary {
                    stop,
                    name: name.clone(),
                    served: self.count_served(stop),
                    total_wait: self.total_wait(stop),
                    mean_wait: self.mean_wait(stop),
                }
            })
            .collect()
    }

    /// One line per stop with its average wait
    pub fn generate_average_wait_report(&self) -> String {
        let mut output = String::new();
        for summary in self.stop_summaries() {
            output.push_str(&summary.to_string());
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for WaitStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_average_wait_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(stop: usize, minutes: u32) -> WaitSample {
        WaitSample { stop: StopId(stop), minutes }
    }

    fn names() -> Vec<String> {
        vec!["North".to_string(), "South".to_string()]
    }

    #[test]
    fn test_statistics_initialization() {
        let stats = WaitStatistics::new(names());
        assert_eq!(stats.num_stops(), 2);
        assert_eq!(stats.total_served(), 0);
        assert!(stats.all_samples().is_empty());
        assert!(stats.overall_mean_wait().is_none());
        assert!(stats.max_wait().is_none());
    }

    #[test]
    fn test_mean_wait_per_stop() {
        let mut stats = WaitStatistics::new(names());
        stats.record_all(&[sample(0, 4), sample(0, 7), sample(1, 2), sample(0, 1)]);

        assert_eq!(stats.count_served(StopId(0)), 3);
        assert_eq!(stats.total_wait(StopId(0)), 12);
        assert_eq!(stats.mean_wait(StopId(0)), Some(4.0));
        assert_eq!(stats.mean_wait(StopId(1)), Some(2.0));
        assert_eq!(stats.overall_mean_wait(), Some(3.5));
        assert_eq!(stats.max_wait(), Some(7));
    }

    #[test]
    fn test_samples_keep_recording_order() {
        let mut stats = WaitStatistics::new(names());
        stats.record_all(&[sample(1, 9), sample(0, 3), sample(1, 0)]);

        assert_eq!(stats.all_samples(), &[9, 3, 0]);
        assert_eq!(stats.samples_for(StopId(1)), &[9, 0]);
        assert_eq!(stats.samples_for(StopId(0)), &[3]);
        assert_eq!(stats.samples_by_stop().len(), 2);
    }

    #[test]
    fn test_unserved_stop_reports_undefined_mean() {
        let mut stats = WaitStatistics::new(names());
        stats.record(sample(0, 5));

        assert!(stats.mean_wait(StopId(1)).is_none());

        let report = stats.generate_average_wait_report();
        assert!(report.contains("The average time waited at North is 5.00 minutes."));
        assert!(report.contains("South is undefined (no data"));
        assert!(!report.contains("NaN"));
    }

    #[test]
    fn test_stop_summaries() {
        let mut stats = WaitStatistics::new(names());
        stats.record_all(&[sample(0, 1), sample(0, 2)]);

        let summaries = stats.stop_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].served, 2);
        assert_eq!(summaries[0].mean_wait, Some(1.5));
        assert_eq!(summaries[1].name, "South");
        assert_eq!(summaries[1].mean_wait, None);
    }

    #[test]
    fn test_summary_serializes_undefined_as_null() {
        let stats = WaitStatistics::new(names());
        let json = serde_json::to_string(&stats.stop_summaries()[0]).unwrap();
        assert!(json.contains("\"mean_wait\":null"));
    }
}
